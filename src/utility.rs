use std::{
  ffi::{c_char, CStr, FromBytesUntilNulError},
  slice,
};

use ash::vk;

// this module contains general functions used in other modules

pub fn parse_vulkan_api_version(v: u32) -> String {
  format!(
    "{}.{}.{}",
    vk::api_version_major(v),
    vk::api_version_minor(v),
    vk::api_version_patch(v)
  )
}

// Vulkan returns names as fixed size null terminated arrays
// Scans at most arr.len() bytes and never allocates
pub fn c_char_array_as_cstr(arr: &[c_char]) -> Result<&CStr, FromBytesUntilNulError> {
  // c_char is either i8 or u8 depending on the target, both have the same layout as u8
  let bytes = unsafe { slice::from_raw_parts(arr.as_ptr() as *const u8, arr.len()) };
  CStr::from_bytes_until_nul(bytes)
}
