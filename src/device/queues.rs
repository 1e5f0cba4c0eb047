use ash::vk;

use crate::{errors::QueueAllocationError, native::InstanceFns};

use super::PhysicalDevice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyInfo {
  pub flags: vk::QueueFlags,
  pub queue_count: u32,
}

impl QueueFamilyInfo {
  pub fn supports(&self, flags: vk::QueueFlags) -> bool {
    self.flags.contains(flags)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueRole {
  Graphics,
  Compute,
  Present,
}

impl QueueRole {
  // roles are always walked in this order
  pub const ALL: [QueueRole; 3] = [QueueRole::Graphics, QueueRole::Compute, QueueRole::Present];
}

/// Family index chosen for each queue role. Roles may share a family.
///
/// Owns the family table the indices refer to; drop it once the logical device exists.
#[derive(Debug)]
pub struct QueueRoleAssignment {
  graphics_family: u32,
  compute_family: u32,
  present_family: u32,
  families: Box<[QueueFamilyInfo]>,
}

impl QueueRoleAssignment {
  pub fn graphics_family(&self) -> u32 {
    self.graphics_family
  }

  pub fn compute_family(&self) -> u32 {
    self.compute_family
  }

  pub fn present_family(&self) -> u32 {
    self.present_family
  }

  pub fn family_of(&self, role: QueueRole) -> u32 {
    match role {
      QueueRole::Graphics => self.graphics_family,
      QueueRole::Compute => self.compute_family,
      QueueRole::Present => self.present_family,
    }
  }

  pub fn families(&self) -> &[QueueFamilyInfo] {
    &self.families
  }
}

/// Picks a queue family for each role.
///
/// Graphics is taken first as it is the scarcest capability. Compute and present prefer families
/// not already used by a previous role and fall back to sharing one.
pub fn allocate_queues<I: InstanceFns>(
  physical_device: &PhysicalDevice<I>,
  surface: vk::SurfaceKHR,
) -> Result<QueueRoleAssignment, QueueAllocationError> {
  let families = physical_device.queue_families();
  log::debug!("Queue family table: {:?}", families);

  let (graphics_family, compute_family, present_family) =
    assign_roles(&families, |i| physical_device.supports_present_on(i, surface))?;

  log::debug!(
    "Queue roles: graphics {}, compute {}, present {}",
    graphics_family,
    compute_family,
    present_family
  );

  Ok(QueueRoleAssignment {
    graphics_family,
    compute_family,
    present_family,
    families,
  })
}

fn first_family(
  families: &[QueueFamilyInfo],
  mut accept: impl FnMut(u32, &QueueFamilyInfo) -> bool,
) -> Option<u32> {
  families
    .iter()
    .enumerate()
    .map(|(i, family)| (i as u32, family))
    .find(|(i, family)| accept(*i, *family))
    .map(|(i, _)| i)
}

pub(crate) fn assign_roles(
  families: &[QueueFamilyInfo],
  mut supports_present: impl FnMut(u32) -> Result<bool, vk::Result>,
) -> Result<(u32, u32, u32), QueueAllocationError> {
  let graphics = first_family(families, |_, f| f.supports(vk::QueueFlags::GRAPHICS))
    .ok_or(QueueAllocationError::NoGraphicsQueue)?;

  let compute = match first_family(families, |i, f| {
    i != graphics && f.supports(vk::QueueFlags::COMPUTE)
  }) {
    Some(i) => i,
    None if families[graphics as usize].supports(vk::QueueFlags::COMPUTE) => graphics,
    None => return Err(QueueAllocationError::NoComputeQueue),
  };

  // the closure can't use `?`, so the first query error is stashed and returned afterwards
  let mut query_error = None;
  let independent_present = first_family(families, |i, _| {
    if i == graphics || i == compute || query_error.is_some() {
      return false;
    }
    supports_present(i).unwrap_or_else(|err| {
      query_error = Some(err);
      false
    })
  });
  if let Some(err) = query_error {
    return Err(err.into());
  }
  if let Some(present) = independent_present {
    return Ok((graphics, compute, present));
  }

  // share with graphics or compute, trying the family with more queues first
  // (equal counts keep graphics first)
  let mut candidates = [graphics, compute];
  if families[compute as usize].queue_count > families[graphics as usize].queue_count {
    candidates.swap(0, 1);
  }
  let candidates = if graphics == compute {
    &candidates[..1]
  } else {
    &candidates[..]
  };
  for &candidate in candidates {
    if supports_present(candidate)? {
      return Ok((graphics, compute, candidate));
    }
  }

  Err(QueueAllocationError::NoPresentQueue)
}
