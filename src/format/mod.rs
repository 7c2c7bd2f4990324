pub mod ilff;
pub mod mef;

use std::fmt::{Debug, Display, Formatter, Write};

use binrw::BinRead;
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, FromBytes, FromZeroes, AsBytes, Unaligned)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl Display for FourCC {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for c in self.0 {
            f.write_char(c as char)?;
        }
        Ok(())
    }
}

impl Debug for FourCC {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_char('"')?;
        for c in self.0 {
            f.write_char(c as char)?;
        }
        f.write_char('"')?;
        Ok(())
    }
}

impl PartialEq<[u8; 4]> for FourCC {
    fn eq(&self, other: &[u8; 4]) -> bool { &self.0 == other }
}

#[derive(BinRead, Copy, Clone, Debug, PartialEq)]
pub struct CVector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<CVector3f> for mint::Vector3<f32> {
    fn from(v: CVector3f) -> Self { Self { x: v.x, y: v.y, z: v.z } }
}

#[derive(BinRead, Copy, Clone, Debug, PartialEq)]
pub struct CVector2f {
    pub x: f32,
    pub y: f32,
}

impl From<CVector2f> for mint::Vector2<f32> {
    fn from(v: CVector2f) -> Self { Self { x: v.x, y: v.y } }
}
