//! Vulkan device bring-up: queue family selection per role and logical device creation.

pub mod bounded_set;
pub mod device;
pub mod errors;
pub mod initialization;
pub mod native;
mod utility;

use std::ffi::CStr;

use ash::vk;

// array of validation layers that should be loaded
#[cfg(feature = "vl")]
pub const VALIDATION_LAYERS: [&CStr; 1] = [c"VK_LAYER_KHRONOS_validation"];
#[cfg(feature = "vl")]
pub const ADDITIONAL_VALIDATION_FEATURES: [vk::ValidationFeatureEnableEXT; 2] = [
  vk::ValidationFeatureEnableEXT::BEST_PRACTICES,
  vk::ValidationFeatureEnableEXT::SYNCHRONIZATION_VALIDATION,
];

// Vulkan API version required by the application, physical devices reporting a lower version
// are skipped
pub const TARGET_API_VERSION: u32 = vk::API_VERSION_1_1;

pub const APPLICATION_NAME: &CStr = c"Vulkan device bring-up";
pub const APPLICATION_VERSION: u32 = vk::make_api_version(0, 1, 0, 0);

pub const REQUIRED_INSTANCE_EXTENSIONS: [&CStr; 2] =
  [ash::khr::surface::NAME, ash::ext::headless_surface::NAME];
pub const REQUIRED_DEVICE_EXTENSIONS: [&CStr; 1] = [ash::khr::swapchain::NAME];
// extension names passed to device creation are kept inline
pub const MAX_DEVICE_EXTENSIONS: usize = 16;

// all queues are created with the same priority
pub const QUEUE_PRIORITY: f32 = 1.0;
