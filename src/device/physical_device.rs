use std::{ffi::CStr, ops::Deref};

use ash::vk;

use crate::{native::InstanceFns, utility};

use super::{vendor::Vendor, QueueFamilyInfo};

fn device_type_name(device_type: vk::PhysicalDeviceType) -> &'static str {
  match device_type {
    vk::PhysicalDeviceType::INTEGRATED_GPU => "Integrated GPU",
    vk::PhysicalDeviceType::DISCRETE_GPU => "Discrete GPU",
    vk::PhysicalDeviceType::VIRTUAL_GPU => "Virtual GPU",
    vk::PhysicalDeviceType::CPU => "CPU",
    _ => "Unknown",
  }
}

// Saves physical device information in order to not query it multiple times
// Read only after construction
pub struct PhysicalDevice<'i, I: InstanceFns> {
  instance: &'i I,
  inner: vk::PhysicalDevice,
  properties: vk::PhysicalDeviceProperties,
  mem_properties: vk::PhysicalDeviceMemoryProperties,
}

impl<I: InstanceFns> Deref for PhysicalDevice<'_, I> {
  type Target = vk::PhysicalDevice;

  fn deref(&self) -> &Self::Target {
    &self.inner
  }
}

impl<'i, I: InstanceFns> PhysicalDevice<'i, I> {
  pub unsafe fn new(instance: &'i I, physical_device: vk::PhysicalDevice) -> Self {
    let properties = instance.physical_device_properties(physical_device);
    let mem_properties = instance.physical_device_memory_properties(physical_device);
    Self {
      instance,
      inner: physical_device,
      properties,
      mem_properties,
    }
  }

  pub fn instance(&self) -> &'i I {
    self.instance
  }

  /// Device name as reported by the driver.
  pub fn name(&self) -> &CStr {
    utility::c_char_array_as_cstr(&self.properties.device_name).unwrap_or_default()
  }

  pub fn properties(&self) -> &vk::PhysicalDeviceProperties {
    &self.properties
  }

  pub fn mem_properties(&self) -> &vk::PhysicalDeviceMemoryProperties {
    &self.mem_properties
  }

  pub fn memory_types(&self) -> &[vk::MemoryType] {
    &self.mem_properties.memory_types[0..(self.mem_properties.memory_type_count as usize)]
  }

  /// All device extensions, queried with a count call followed by a fill call.
  pub fn supported_extensions(&self) -> Result<Vec<vk::ExtensionProperties>, vk::Result> {
    unsafe {
      let count = self.instance.device_extension_count(self.inner)?;
      let mut properties = vec![vk::ExtensionProperties::default(); count as usize];
      let written = self
        .instance
        .device_extension_properties(self.inner, &mut properties)?;
      properties.truncate(written);
      Ok(properties)
    }
  }

  pub fn supports_extensions(&self, required: &[&CStr]) -> Result<bool, vk::Result> {
    let properties = self.supported_extensions()?;

    for req in required {
      let found = properties.iter().any(|props| {
        utility::c_char_array_as_cstr(&props.extension_name).is_ok_and(|name| name == *req)
      });
      if !found {
        log::debug!("{:?} does not support extension {:?}", self.name(), req);
        return Ok(false);
      }
    }

    Ok(true)
  }

  /// True if the device can present to `surface` with at least one format and one present mode.
  ///
  /// Only count queries are issued, nothing is allocated.
  pub fn supports_surface(&self, surface: vk::SurfaceKHR) -> Result<bool, vk::Result> {
    unsafe {
      let format_count = self.instance.surface_format_count(self.inner, surface)?;
      if format_count == 0 {
        return Ok(false);
      }
      let present_mode_count = self
        .instance
        .surface_present_mode_count(self.inner, surface)?;
      Ok(present_mode_count > 0)
    }
  }

  pub fn supports_present_on(
    &self,
    family_index: u32,
    surface: vk::SurfaceKHR,
  ) -> Result<bool, vk::Result> {
    unsafe {
      self
        .instance
        .surface_supports_queue_family(self.inner, family_index, surface)
    }
  }

  /// Queue family table, owned by the caller.
  pub fn queue_families(&self) -> Box<[QueueFamilyInfo]> {
    unsafe { self.instance.queue_family_properties(self.inner) }
      .into_iter()
      .map(|props| QueueFamilyInfo {
        flags: props.queue_flags,
        queue_count: props.queue_count,
      })
      .collect()
  }

  pub fn log_properties(&self) {
    let vendor = Vendor::from_id(self.properties.vendor_id);
    let driver_version = vendor.parse_driver_version(self.properties.driver_version);

    log::info!(
      "\nFound physical device {:?}:
      API Version: {},
      Vendor: {},
      Driver Version: {},
      ID: {},
      Type: {},",
      self.name(),
      utility::parse_vulkan_api_version(self.properties.api_version),
      vendor,
      driver_version,
      self.properties.device_id,
      device_type_name(self.properties.device_type),
    );
  }
}
