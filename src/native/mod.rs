//! Native API surface consumed by the device bring-up code.
//!
//! Everything above this module talks to Vulkan through [`InstanceFns`] and [`DeviceFns`] so that
//! queue allocation and logical device creation can run against a fake driver in tests.

mod vulkan;

#[cfg(test)]
pub(crate) mod fake;

use ash::vk;

pub use vulkan::{VulkanDevice, VulkanInstance, REQUIRED_DEVICE_ENTRY_POINTS};

use crate::errors::DispatchLoadError;

/// Instance level entry points (including the surface extension ones).
pub trait InstanceFns {
  /// Entry point table bound to a logical device created by this instance.
  type Device: DeviceFns;

  unsafe fn enumerate_physical_devices(&self) -> Result<Vec<vk::PhysicalDevice>, vk::Result>;

  unsafe fn physical_device_properties(
    &self,
    physical_device: vk::PhysicalDevice,
  ) -> vk::PhysicalDeviceProperties;

  unsafe fn physical_device_memory_properties(
    &self,
    physical_device: vk::PhysicalDevice,
  ) -> vk::PhysicalDeviceMemoryProperties;

  unsafe fn queue_family_properties(
    &self,
    physical_device: vk::PhysicalDevice,
  ) -> Vec<vk::QueueFamilyProperties>;

  /// First half of the two-call enumeration idiom.
  unsafe fn device_extension_count(
    &self,
    physical_device: vk::PhysicalDevice,
  ) -> Result<u32, vk::Result>;

  /// Second half of the two-call enumeration idiom. Returns how many elements were written.
  unsafe fn device_extension_properties(
    &self,
    physical_device: vk::PhysicalDevice,
    out: &mut [vk::ExtensionProperties],
  ) -> Result<usize, vk::Result>;

  unsafe fn surface_format_count(
    &self,
    physical_device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
  ) -> Result<u32, vk::Result>;

  unsafe fn surface_present_mode_count(
    &self,
    physical_device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
  ) -> Result<u32, vk::Result>;

  unsafe fn surface_supports_queue_family(
    &self,
    physical_device: vk::PhysicalDevice,
    family_index: u32,
    surface: vk::SurfaceKHR,
  ) -> Result<bool, vk::Result>;

  unsafe fn create_device(
    &self,
    physical_device: vk::PhysicalDevice,
    create_info: &vk::DeviceCreateInfo,
  ) -> Result<vk::Device, vk::Result>;

  unsafe fn load_device(&self, device: vk::Device) -> Result<Self::Device, DispatchLoadError>;

  /// Destroys a device for which no entry point table could be loaded.
  unsafe fn destroy_device(&self, device: vk::Device);
}

/// Device level entry points.
pub trait DeviceFns {
  unsafe fn get_device_queue(&self, family_index: u32, queue_index: u32) -> vk::Queue;

  unsafe fn destroy_device(&self);
}
