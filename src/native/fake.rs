// In-memory driver used by tests

use std::{
  cell::{Cell, RefCell},
  ffi::{c_char, CStr},
  rc::Rc,
  slice,
};

use ash::vk::{self, Handle};

use crate::errors::DispatchLoadError;

use super::{DeviceFns, InstanceFns};

pub fn fake_queue(family_index: u32, queue_index: u32) -> vk::Queue {
  vk::Queue::from_raw(((family_index as u64 + 1) << 16) | queue_index as u64)
}

fn write_c_chars(dst: &mut [c_char], src: &CStr) {
  for (d, s) in dst.iter_mut().zip(src.to_bytes_with_nul()) {
    *d = *s as c_char;
  }
}

pub struct FakePhysicalDevice {
  pub name: &'static CStr,
  pub api_version: u32,
  pub device_type: vk::PhysicalDeviceType,
  pub vendor_id: u32,
  pub families: Vec<(vk::QueueFlags, u32)>,
  pub present_families: Vec<u32>,
  pub extensions: Vec<&'static CStr>,
  pub surface_format_count: u32,
  pub present_mode_count: u32,
  pub fail_extension_fill: bool,
  pub fail_present_query: Option<vk::Result>,
  pub fail_device_creation: Option<vk::Result>,
  pub fail_dispatch_load: Option<DispatchLoadError>,
}

impl FakePhysicalDevice {
  pub fn new(families: &[(vk::QueueFlags, u32)]) -> Self {
    Self {
      name: c"Fake GPU",
      api_version: vk::API_VERSION_1_3,
      device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
      vendor_id: 0x10DE,
      families: families.to_vec(),
      present_families: Vec::new(),
      extensions: vec![ash::khr::swapchain::NAME],
      surface_format_count: 2,
      present_mode_count: 1,
      fail_extension_fill: false,
      fail_present_query: None,
      fail_device_creation: None,
      fail_dispatch_load: None,
    }
  }

  pub fn presents_on(mut self, families: &[u32]) -> Self {
    self.present_families = families.to_vec();
    self
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedDevice {
  pub handle: vk::Device,
  pub physical_device: vk::PhysicalDevice,
  // (family index, queue count, priorities)
  pub queue_requests: Vec<(u32, u32, Vec<f32>)>,
  pub extensions: Vec<String>,
}

pub struct FakeInstance {
  pub physical_devices: Vec<FakePhysicalDevice>,
  pub created: RefCell<Vec<CreatedDevice>>,
  pub destroyed: Rc<RefCell<Vec<vk::Device>>>,
  pub present_queries: RefCell<Vec<u32>>,
  next_device: Cell<u64>,
}

impl FakeInstance {
  pub fn new(physical_devices: Vec<FakePhysicalDevice>) -> Self {
    Self {
      physical_devices,
      created: RefCell::new(Vec::new()),
      destroyed: Rc::new(RefCell::new(Vec::new())),
      present_queries: RefCell::new(Vec::new()),
      next_device: Cell::new(1),
    }
  }

  pub fn single(physical_device: FakePhysicalDevice) -> Self {
    Self::new(vec![physical_device])
  }

  pub fn handle(index: usize) -> vk::PhysicalDevice {
    vk::PhysicalDevice::from_raw(index as u64 + 1)
  }

  pub fn surface() -> vk::SurfaceKHR {
    vk::SurfaceKHR::from_raw(0xCAFE)
  }

  fn get(&self, physical_device: vk::PhysicalDevice) -> &FakePhysicalDevice {
    &self.physical_devices[physical_device.as_raw() as usize - 1]
  }
}

impl InstanceFns for FakeInstance {
  type Device = FakeDevice;

  unsafe fn enumerate_physical_devices(&self) -> Result<Vec<vk::PhysicalDevice>, vk::Result> {
    Ok((0..self.physical_devices.len()).map(Self::handle).collect())
  }

  unsafe fn physical_device_properties(
    &self,
    physical_device: vk::PhysicalDevice,
  ) -> vk::PhysicalDeviceProperties {
    let fake = self.get(physical_device);
    let mut properties = vk::PhysicalDeviceProperties {
      api_version: fake.api_version,
      device_type: fake.device_type,
      vendor_id: fake.vendor_id,
      ..Default::default()
    };
    write_c_chars(&mut properties.device_name, fake.name);
    properties
  }

  unsafe fn physical_device_memory_properties(
    &self,
    _physical_device: vk::PhysicalDevice,
  ) -> vk::PhysicalDeviceMemoryProperties {
    let mut properties = vk::PhysicalDeviceMemoryProperties {
      memory_type_count: 1,
      memory_heap_count: 1,
      ..Default::default()
    };
    properties.memory_types[0].property_flags = vk::MemoryPropertyFlags::DEVICE_LOCAL;
    properties.memory_heaps[0].size = 1 << 30;
    properties
  }

  unsafe fn queue_family_properties(
    &self,
    physical_device: vk::PhysicalDevice,
  ) -> Vec<vk::QueueFamilyProperties> {
    self
      .get(physical_device)
      .families
      .iter()
      .map(|&(queue_flags, queue_count)| vk::QueueFamilyProperties {
        queue_flags,
        queue_count,
        ..Default::default()
      })
      .collect()
  }

  unsafe fn device_extension_count(
    &self,
    physical_device: vk::PhysicalDevice,
  ) -> Result<u32, vk::Result> {
    Ok(self.get(physical_device).extensions.len() as u32)
  }

  unsafe fn device_extension_properties(
    &self,
    physical_device: vk::PhysicalDevice,
    out: &mut [vk::ExtensionProperties],
  ) -> Result<usize, vk::Result> {
    let fake = self.get(physical_device);
    if fake.fail_extension_fill {
      return Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY);
    }
    for (props, name) in out.iter_mut().zip(fake.extensions.iter()) {
      write_c_chars(&mut props.extension_name, name);
      props.spec_version = 1;
    }
    Ok(out.len().min(fake.extensions.len()))
  }

  unsafe fn surface_format_count(
    &self,
    physical_device: vk::PhysicalDevice,
    _surface: vk::SurfaceKHR,
  ) -> Result<u32, vk::Result> {
    Ok(self.get(physical_device).surface_format_count)
  }

  unsafe fn surface_present_mode_count(
    &self,
    physical_device: vk::PhysicalDevice,
    _surface: vk::SurfaceKHR,
  ) -> Result<u32, vk::Result> {
    Ok(self.get(physical_device).present_mode_count)
  }

  unsafe fn surface_supports_queue_family(
    &self,
    physical_device: vk::PhysicalDevice,
    family_index: u32,
    _surface: vk::SurfaceKHR,
  ) -> Result<bool, vk::Result> {
    self.present_queries.borrow_mut().push(family_index);
    let fake = self.get(physical_device);
    if let Some(err) = fake.fail_present_query {
      return Err(err);
    }
    Ok(fake.present_families.contains(&family_index))
  }

  unsafe fn create_device(
    &self,
    physical_device: vk::PhysicalDevice,
    create_info: &vk::DeviceCreateInfo,
  ) -> Result<vk::Device, vk::Result> {
    if let Some(err) = self.get(physical_device).fail_device_creation {
      return Err(err);
    }

    let queue_infos = slice::from_raw_parts(
      create_info.p_queue_create_infos,
      create_info.queue_create_info_count as usize,
    );
    let queue_requests = queue_infos
      .iter()
      .map(|info| {
        let priorities =
          slice::from_raw_parts(info.p_queue_priorities, info.queue_count as usize).to_vec();
        (info.queue_family_index, info.queue_count, priorities)
      })
      .collect();
    let extensions = slice::from_raw_parts(
      create_info.pp_enabled_extension_names,
      create_info.enabled_extension_count as usize,
    )
    .iter()
    .map(|&ptr| CStr::from_ptr(ptr).to_string_lossy().into_owned())
    .collect();

    let handle = vk::Device::from_raw(self.next_device.get());
    self.next_device.set(self.next_device.get() + 1);
    self.created.borrow_mut().push(CreatedDevice {
      handle,
      physical_device,
      queue_requests,
      extensions,
    });
    Ok(handle)
  }

  unsafe fn load_device(&self, device: vk::Device) -> Result<FakeDevice, DispatchLoadError> {
    let created = self.created.borrow();
    let record = created
      .iter()
      .find(|c| c.handle == device)
      .expect("device was not created by this instance");
    if let Some(err) = self.get(record.physical_device).fail_dispatch_load {
      return Err(err);
    }
    Ok(FakeDevice {
      handle: device,
      destroyed: self.destroyed.clone(),
    })
  }

  unsafe fn destroy_device(&self, device: vk::Device) {
    self.destroyed.borrow_mut().push(device);
  }
}

pub struct FakeDevice {
  handle: vk::Device,
  destroyed: Rc<RefCell<Vec<vk::Device>>>,
}

impl DeviceFns for FakeDevice {
  unsafe fn get_device_queue(&self, family_index: u32, queue_index: u32) -> vk::Queue {
    fake_queue(family_index, queue_index)
  }

  unsafe fn destroy_device(&self) {
    self.destroyed.borrow_mut().push(self.handle);
  }
}
