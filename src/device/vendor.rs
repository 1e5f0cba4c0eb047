use std::fmt::Display;

use crate::utility;

// implements some display properties for vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
  Nvidia,
  Amd,
  Arm,
  Intel,
  ImgTec,
  Qualcomm,
  Mesa,
  Unknown(u32),
}

impl Vendor {
  pub fn from_id(id: u32) -> Self {
    // PCI vendor ids, Mesa uses a Khronos vendor id for its software drivers
    match id {
      0x1002 => Self::Amd,
      0x1010 => Self::ImgTec,
      0x10DE => Self::Nvidia,
      0x13B5 => Self::Arm,
      0x5143 => Self::Qualcomm,
      0x8086 => Self::Intel,
      0x10005 => Self::Mesa,
      _ => Self::Unknown(id),
    }
  }

  pub fn parse_driver_version(&self, v: u32) -> String {
    match self {
      // major (10 bits), minor (8 bits), secondary branch (8 bits), tertiary branch (6 bits)
      Self::Nvidia => format!(
        "{}.{}.{}.{}",
        v >> 22,
        (v >> 14) & 0xFF,
        (v >> 6) & 0xFF,
        v & 0x3F
      ),
      // everyone else is assumed to follow the packed api version layout
      _ => utility::parse_vulkan_api_version(v),
    }
  }
}

impl Display for Vendor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Nvidia => f.write_str("NVIDIA"),
      Self::Amd => f.write_str("AMD"),
      Self::Arm => f.write_str("ARM"),
      Self::Intel => f.write_str("INTEL"),
      Self::ImgTec => f.write_str("ImgTec"),
      Self::Qualcomm => f.write_str("Qualcomm"),
      Self::Mesa => f.write_str("Mesa"),
      Self::Unknown(id) => write!(f, "Unknown ({:#x})", id),
    }
  }
}
