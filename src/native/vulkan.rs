use std::{
  ffi::CStr,
  mem,
  ops::Deref,
  ptr,
};

use ash::vk;

use crate::errors::DispatchLoadError;

use super::{DeviceFns, InstanceFns};

const DESTROY_DEVICE: &CStr = c"vkDestroyDevice";

// the bring-up code and its direct users need at least these, on top of vkDestroyDevice
pub const REQUIRED_DEVICE_ENTRY_POINTS: [&CStr; 4] = [
  c"vkGetDeviceQueue",
  c"vkDeviceWaitIdle",
  c"vkQueueSubmit",
  c"vkQueueWaitIdle",
];

pub struct VulkanInstance {
  inner: ash::Instance,
  surface: ash::khr::surface::Instance,
}

impl Deref for VulkanInstance {
  type Target = ash::Instance;

  fn deref(&self) -> &Self::Target {
    &self.inner
  }
}

impl VulkanInstance {
  pub fn new(entry: &ash::Entry, instance: ash::Instance) -> Self {
    let surface = ash::khr::surface::Instance::new(entry, &instance);
    Self {
      inner: instance,
      surface,
    }
  }

  pub fn surface_loader(&self) -> &ash::khr::surface::Instance {
    &self.surface
  }

  pub unsafe fn destroy_self(&self) {
    self.inner.destroy_instance(None);
  }

  unsafe fn destroy_device_fn(&self, device: vk::Device) -> Option<vk::PFN_vkDestroyDevice> {
    (self.inner.fp_v1_0().get_device_proc_addr)(device, DESTROY_DEVICE.as_ptr())
      .map(|f| mem::transmute::<_, vk::PFN_vkDestroyDevice>(f))
  }
}

impl InstanceFns for VulkanInstance {
  type Device = VulkanDevice;

  unsafe fn enumerate_physical_devices(&self) -> Result<Vec<vk::PhysicalDevice>, vk::Result> {
    self.inner.enumerate_physical_devices()
  }

  unsafe fn physical_device_properties(
    &self,
    physical_device: vk::PhysicalDevice,
  ) -> vk::PhysicalDeviceProperties {
    self.inner.get_physical_device_properties(physical_device)
  }

  unsafe fn physical_device_memory_properties(
    &self,
    physical_device: vk::PhysicalDevice,
  ) -> vk::PhysicalDeviceMemoryProperties {
    self
      .inner
      .get_physical_device_memory_properties(physical_device)
  }

  unsafe fn queue_family_properties(
    &self,
    physical_device: vk::PhysicalDevice,
  ) -> Vec<vk::QueueFamilyProperties> {
    self
      .inner
      .get_physical_device_queue_family_properties(physical_device)
  }

  unsafe fn device_extension_count(
    &self,
    physical_device: vk::PhysicalDevice,
  ) -> Result<u32, vk::Result> {
    let mut count = 0;
    (self.inner.fp_v1_0().enumerate_device_extension_properties)(
      physical_device,
      ptr::null(),
      &mut count,
      ptr::null_mut(),
    )
    .result_with_success(count)
  }

  unsafe fn device_extension_properties(
    &self,
    physical_device: vk::PhysicalDevice,
    out: &mut [vk::ExtensionProperties],
  ) -> Result<usize, vk::Result> {
    let mut count = out.len() as u32;
    // VK_INCOMPLETE (the list grew between calls) is treated as an error
    (self.inner.fp_v1_0().enumerate_device_extension_properties)(
      physical_device,
      ptr::null(),
      &mut count,
      out.as_mut_ptr(),
    )
    .result_with_success(count as usize)
  }

  unsafe fn surface_format_count(
    &self,
    physical_device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
  ) -> Result<u32, vk::Result> {
    let mut count = 0;
    (self.surface.fp().get_physical_device_surface_formats_khr)(
      physical_device,
      surface,
      &mut count,
      ptr::null_mut(),
    )
    .result_with_success(count)
  }

  unsafe fn surface_present_mode_count(
    &self,
    physical_device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
  ) -> Result<u32, vk::Result> {
    let mut count = 0;
    (self.surface.fp().get_physical_device_surface_present_modes_khr)(
      physical_device,
      surface,
      &mut count,
      ptr::null_mut(),
    )
    .result_with_success(count)
  }

  unsafe fn surface_supports_queue_family(
    &self,
    physical_device: vk::PhysicalDevice,
    family_index: u32,
    surface: vk::SurfaceKHR,
  ) -> Result<bool, vk::Result> {
    self
      .surface
      .get_physical_device_surface_support(physical_device, family_index, surface)
  }

  unsafe fn create_device(
    &self,
    physical_device: vk::PhysicalDevice,
    create_info: &vk::DeviceCreateInfo,
  ) -> Result<vk::Device, vk::Result> {
    // ash::Instance::create_device also loads the entry point table; here it is a separate step
    let mut device = vk::Device::null();
    (self.inner.fp_v1_0().create_device)(physical_device, create_info, ptr::null(), &mut device)
      .result_with_success(device)
  }

  unsafe fn load_device(&self, device: vk::Device) -> Result<VulkanDevice, DispatchLoadError> {
    // checked first, every other failure relies on it for rollback
    if self.destroy_device_fn(device).is_none() {
      log::error!("Failed to resolve device entry point {:?}", DESTROY_DEVICE);
      return Err(DispatchLoadError::DestroyUnavailable);
    }

    let get_device_proc_addr = self.inner.fp_v1_0().get_device_proc_addr;
    for name in REQUIRED_DEVICE_ENTRY_POINTS {
      if get_device_proc_addr(device, name.as_ptr()).is_none() {
        log::error!("Failed to resolve device entry point {:?}", name);
        return Err(DispatchLoadError::MissingEntryPoint(name));
      }
    }

    Ok(VulkanDevice {
      inner: ash::Device::load(self.inner.fp_v1_0(), device),
    })
  }

  unsafe fn destroy_device(&self, device: vk::Device) {
    match self.destroy_device_fn(device) {
      Some(destroy_device) => destroy_device(device, ptr::null()),
      None => log::error!("vkDestroyDevice could not be resolved, leaking {:?}", device),
    }
  }
}

pub struct VulkanDevice {
  inner: ash::Device,
}

impl Deref for VulkanDevice {
  type Target = ash::Device;

  fn deref(&self) -> &Self::Target {
    &self.inner
  }
}

impl DeviceFns for VulkanDevice {
  unsafe fn get_device_queue(&self, family_index: u32, queue_index: u32) -> vk::Queue {
    self.inner.get_device_queue(family_index, queue_index)
  }

  unsafe fn destroy_device(&self) {
    self.inner.destroy_device(None);
  }
}
