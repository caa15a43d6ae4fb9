//! Decoder for GeoPackage geometry blobs.
//!
//! A GeoPackage blob is a small header followed by standard WKB:
//!
//! ```text
//! "GP" | version | flags | srs_id (i32) | envelope (0/4/6/8 doubles) | WKB
//! ```
//!
//! Only areal geometries are accepted. Z and M ordinates (ISO or EWKB
//! type codes) are read and dropped.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::error::WkbError;

const WKB_POLYGON: u32 = 3;
const WKB_MULTI_POLYGON: u32 = 6;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    const fn from_marker(marker: u8) -> Result<Self, WkbError> {
        match marker {
            0 => Ok(Self::Big),
            1 => Ok(Self::Little),
            other => Err(WkbError::BadByteOrder(other)),
        }
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], WkbError> {
        let end = self.pos.checked_add(N).ok_or(WkbError::Truncated(self.pos))?;
        let chunk = self
            .bytes
            .get(self.pos..end)
            .ok_or(WkbError::Truncated(self.pos))?;
        let array: [u8; N] = chunk.try_into().map_err(|_e| WkbError::Truncated(self.pos))?;
        self.pos = end;
        Ok(array)
    }

    fn skip(&mut self, count: usize) -> Result<(), WkbError> {
        let end = self.pos.checked_add(count).ok_or(WkbError::Truncated(self.pos))?;
        if end > self.bytes.len() {
            return Err(WkbError::Truncated(self.pos));
        }
        self.pos = end;
        Ok(())
    }

    fn u8(&mut self) -> Result<u8, WkbError> {
        let [byte] = self.take::<1>()?;
        Ok(byte)
    }

    fn u32(&mut self, order: ByteOrder) -> Result<u32, WkbError> {
        let raw = self.take::<4>()?;
        Ok(match order {
            ByteOrder::Big => u32::from_be_bytes(raw),
            ByteOrder::Little => u32::from_le_bytes(raw),
        })
    }

    fn count(&mut self, order: ByteOrder) -> Result<usize, WkbError> {
        let at = self.pos;
        let raw = self.u32(order)?;
        usize::try_from(raw).map_err(|_e| WkbError::Truncated(at))
    }

    fn f64(&mut self, order: ByteOrder) -> Result<f64, WkbError> {
        let raw = self.take::<8>()?;
        Ok(match order {
            ByteOrder::Big => f64::from_be_bytes(raw),
            ByteOrder::Little => f64::from_le_bytes(raw),
        })
    }
}

/// Decode a GeoPackage geometry blob into a multipolygon.
///
/// A single polygon becomes a one-member multipolygon; an empty geometry
/// becomes an empty multipolygon.
pub fn decode_gpkg_geometry(blob: &[u8]) -> Result<MultiPolygon<f64>, WkbError> {
    let mut reader = Reader::new(blob);
    if reader.take::<2>()? != *b"GP" {
        return Err(WkbError::BadMagic);
    }
    let _version = reader.u8()?;
    let flags = reader.u8()?;
    if flags & 0b0010_0000 != 0 {
        return Err(WkbError::Extended);
    }
    let envelope_doubles = match (flags >> 1) & 0b111 {
        0 => 0,
        1 => 4,
        2 | 3 => 6,
        4 => 8,
        other => return Err(WkbError::BadEnvelope(other)),
    };
    // srs_id, then the envelope; neither is needed here.
    reader.skip(4)?;
    reader.skip(envelope_doubles * 8)?;

    if flags & 0b0001_0000 != 0 {
        return Ok(MultiPolygon::new(Vec::new()));
    }
    read_areal(&mut reader)
}

/// Decode a bare WKB Polygon or `MultiPolygon`.
#[cfg(test)]
fn decode_wkb(bytes: &[u8]) -> Result<MultiPolygon<f64>, WkbError> {
    read_areal(&mut Reader::new(bytes))
}

/// Geometry kind and number of ordinates per point.
fn read_type(reader: &mut Reader<'_>, order: ByteOrder) -> Result<(u32, usize), WkbError> {
    let raw = reader.u32(order)?;
    let mut dims = 2_usize;
    if raw & EWKB_Z != 0 {
        dims = dims.saturating_add(1);
    }
    if raw & EWKB_M != 0 {
        dims = dims.saturating_add(1);
    }
    if raw & EWKB_SRID != 0 {
        let _srid = reader.u32(order)?;
    }
    let iso = raw & 0x0FFF_FFFF;
    dims = match iso / 1000 {
        0 => dims,
        1 | 2 => dims.saturating_add(1),
        3 => dims.saturating_add(2),
        _ => return Err(WkbError::UnsupportedType(raw)),
    };
    Ok((iso % 1000, dims))
}

fn read_areal(reader: &mut Reader<'_>) -> Result<MultiPolygon<f64>, WkbError> {
    let order = ByteOrder::from_marker(reader.u8()?)?;
    let (kind, dims) = read_type(reader, order)?;
    match kind {
        WKB_POLYGON => Ok(MultiPolygon::new(vec![read_polygon_body(reader, order, dims)?])),
        WKB_MULTI_POLYGON => {
            let count = reader.count(order)?;
            let mut polygons = Vec::new();
            for _ in 0..count {
                let member_order = ByteOrder::from_marker(reader.u8()?)?;
                let (member_kind, member_dims) = read_type(reader, member_order)?;
                if member_kind != WKB_POLYGON {
                    return Err(WkbError::UnsupportedType(member_kind));
                }
                polygons.push(read_polygon_body(reader, member_order, member_dims)?);
            }
            Ok(MultiPolygon::new(polygons))
        }
        other => Err(WkbError::UnsupportedType(other)),
    }
}

fn read_polygon_body(
    reader: &mut Reader<'_>,
    order: ByteOrder,
    dims: usize,
) -> Result<Polygon<f64>, WkbError> {
    let ring_count = reader.count(order)?;
    let mut rings = Vec::new();
    for _ in 0..ring_count {
        let point_count = reader.count(order)?;
        let mut coords = Vec::new();
        for _ in 0..point_count {
            let x = reader.f64(order)?;
            let y = reader.f64(order)?;
            reader.skip(dims.saturating_sub(2) * 8)?;
            coords.push(Coord { x, y });
        }
        rings.push(LineString::new(coords));
    }
    let mut rings = rings.into_iter();
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Ok(Polygon::new(exterior, rings.collect()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Little-endian XY polygon WKB for the given rings.
    pub(crate) fn polygon_wkb(rings: &[&[(f64, f64)]]) -> Vec<u8> {
        let mut out = vec![1_u8];
        out.extend_from_slice(&WKB_POLYGON.to_le_bytes());
        out.extend_from_slice(&u32::try_from(rings.len()).unwrap_or(0).to_le_bytes());
        for ring in rings {
            out.extend_from_slice(&u32::try_from(ring.len()).unwrap_or(0).to_le_bytes());
            for (x, y) in *ring {
                out.extend_from_slice(&x.to_le_bytes());
                out.extend_from_slice(&y.to_le_bytes());
            }
        }
        out
    }

    /// Wrap WKB in a GeoPackage header without an envelope.
    pub(crate) fn gpkg_blob(wkb: &[u8]) -> Vec<u8> {
        let mut out = vec![b'G', b'P', 0, 0b0000_0001];
        out.extend_from_slice(&4326_i32.to_le_bytes());
        out.extend_from_slice(wkb);
        out
    }

    const SQUARE: &[(f64, f64)] = &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)];

    #[test]
    fn decodes_polygon_blob() {
        let blob = gpkg_blob(&polygon_wkb(&[SQUARE]));
        let shape = decode_gpkg_geometry(&blob);
        assert!(shape.is_ok());
        let shape = shape.unwrap_or_else(|_| MultiPolygon::new(Vec::new()));
        assert_eq!(shape.0.len(), 1);
        assert_eq!(shape.0.first().map(|p| p.exterior().0.len()), Some(5));
    }

    #[test]
    fn skips_envelope() {
        let wkb = polygon_wkb(&[SQUARE]);
        let mut blob = vec![b'G', b'P', 0, 0b0000_0011];
        blob.extend_from_slice(&4326_i32.to_le_bytes());
        for bound in [0.0_f64, 1.0, 0.0, 1.0] {
            blob.extend_from_slice(&bound.to_le_bytes());
        }
        blob.extend_from_slice(&wkb);
        assert!(decode_gpkg_geometry(&blob).is_ok_and(|mp| mp.0.len() == 1));
    }

    #[test]
    fn decodes_big_endian_multipolygon_with_z() {
        let mut wkb = vec![0_u8];
        wkb.extend_from_slice(&(WKB_MULTI_POLYGON + 1000).to_be_bytes());
        wkb.extend_from_slice(&1_u32.to_be_bytes());
        wkb.push(0);
        wkb.extend_from_slice(&(WKB_POLYGON + 1000).to_be_bytes());
        wkb.extend_from_slice(&1_u32.to_be_bytes());
        wkb.extend_from_slice(&4_u32.to_be_bytes());
        for (x, y) in [(0.0_f64, 0.0_f64), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)] {
            wkb.extend_from_slice(&x.to_be_bytes());
            wkb.extend_from_slice(&y.to_be_bytes());
            wkb.extend_from_slice(&7.0_f64.to_be_bytes());
        }
        let shape = decode_wkb(&wkb);
        assert!(shape.is_ok());
        let shape = shape.unwrap_or_else(|_| MultiPolygon::new(Vec::new()));
        let ring = shape.0.first().map(|p| p.exterior().0.clone()).unwrap_or_default();
        assert_eq!(ring.get(1), Some(&Coord { x: 2.0, y: 0.0 }));
    }

    #[test]
    fn empty_flag_yields_empty_geometry() {
        let blob = vec![b'G', b'P', 0, 0b0001_0001, 0, 0, 0, 0];
        assert!(decode_gpkg_geometry(&blob).is_ok_and(|mp| mp.0.is_empty()));
    }

    #[test]
    fn rejects_points_and_truncation() {
        let mut point = vec![1_u8];
        point.extend_from_slice(&1_u32.to_le_bytes());
        assert_eq!(decode_wkb(&point), Err(WkbError::UnsupportedType(1)));

        let blob = gpkg_blob(&polygon_wkb(&[SQUARE]));
        let cut = blob.get(..blob.len().saturating_sub(3)).unwrap_or_default();
        assert!(matches!(decode_gpkg_geometry(cut), Err(WkbError::Truncated(_))));
    }

    #[test]
    fn rejects_bad_magic() {
        assert_eq!(decode_gpkg_geometry(b"XX\0\x01\0\0\0\0"), Err(WkbError::BadMagic));
    }
}
