use std::ffi::CStr;

use ash::vk;

use crate::{errors::QueueAllocationError, native::InstanceFns, TARGET_API_VERSION};

use super::{allocate_queues, PhysicalDevice, QueueRoleAssignment};

fn device_type_score(device_type: vk::PhysicalDeviceType) -> u32 {
  // rank devices by commonly most powerful device type
  match device_type {
    vk::PhysicalDeviceType::DISCRETE_GPU => 0,
    vk::PhysicalDeviceType::INTEGRATED_GPU => 1,
    vk::PhysicalDeviceType::VIRTUAL_GPU => 2,
    vk::PhysicalDeviceType::CPU => 3,
    vk::PhysicalDeviceType::OTHER => 4,
    _ => 5,
  }
}

fn score<I: InstanceFns>(
  physical_device: &PhysicalDevice<I>,
  assignment: &QueueRoleAssignment,
) -> u32 {
  let queue_family_importance = 3;
  let device_score_importance = 0;

  // devices that can run compute next to graphics come first
  let queue_score = if assignment.compute_family() != assignment.graphics_family() {
    0
  } else {
    1
  };
  let device_score = device_type_score(physical_device.properties().device_type);

  (queue_score << queue_family_importance) + (device_score << device_score_importance)
}

// Filter devices that are strictly not supported and assign their queue roles
// Query errors are returned, only policy failures skip the device
fn check_physical_device<I: InstanceFns>(
  physical_device: &PhysicalDevice<I>,
  surface: vk::SurfaceKHR,
  required_extensions: &[&CStr],
) -> Result<Option<QueueRoleAssignment>, vk::Result> {
  if physical_device.properties().api_version < TARGET_API_VERSION {
    log::info!(
      "Skipped physical device: Device API version is less than targeted by the application"
    );
    return Ok(None);
  }

  if !physical_device.supports_extensions(required_extensions)? {
    log::info!("Skipped physical device: Device does not support all required extensions");
    return Ok(None);
  }

  if !physical_device.supports_surface(surface)? {
    log::info!("Skipped physical device: Device cannot present to the target surface");
    return Ok(None);
  }

  match allocate_queues(physical_device, surface) {
    Ok(assignment) => Ok(Some(assignment)),
    Err(QueueAllocationError::ApiError(err)) => Err(err),
    Err(err) => {
      log::info!("Skipped physical device: {}", err);
      Ok(None)
    }
  }
}

/// Picks the most suitable physical device that can render and present to `surface`.
///
/// Fails on the first native query error instead of skipping the device it came from.
pub fn select_physical_device<'i, I: InstanceFns>(
  instance: &'i I,
  surface: vk::SurfaceKHR,
  required_extensions: &[&CStr],
) -> Result<Option<(PhysicalDevice<'i, I>, QueueRoleAssignment)>, vk::Result> {
  let mut suitable = Vec::new();
  for handle in unsafe { instance.enumerate_physical_devices()? } {
    let physical_device = unsafe { PhysicalDevice::new(instance, handle) };
    physical_device.log_properties();
    let assignment = check_physical_device(&physical_device, surface, required_extensions)?;
    if let Some(assignment) = assignment {
      suitable.push((physical_device, assignment));
    }
  }

  Ok(
    suitable
      .into_iter()
      .min_by_key(|(physical_device, assignment)| score(physical_device, assignment)),
  )
}
