use std::ffi::{c_char, CStr};

use arrayvec::ArrayVec;
use ash::vk;

use crate::{
  bounded_set::BoundedSet,
  errors::{DeviceCreationError, DispatchLoadError},
  native::{DeviceFns, InstanceFns},
  MAX_DEVICE_EXTENSIONS, QUEUE_PRIORITY,
};

use super::{PhysicalDevice, QueueRole, QueueRoleAssignment};

pub const ROLE_COUNT: usize = QueueRole::ALL.len();

// referenced by the create infos, so it has to outlive device creation
static QUEUE_PRIORITIES: [f32; ROLE_COUNT] = [QUEUE_PRIORITY; ROLE_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueCreateRequest {
  pub family_index: u32,
  pub queue_count: u32,
}

/// Merges roles that share a family into one request per family.
///
/// A family gets one more queue for each extra role that uses it, up to its queue count.
pub fn queue_create_requests(
  assignment: &QueueRoleAssignment,
) -> ArrayVec<QueueCreateRequest, ROLE_COUNT> {
  let families = assignment.families();
  let mut requests: ArrayVec<QueueCreateRequest, ROLE_COUNT> = ArrayVec::new();

  for role in QueueRole::ALL {
    let family_index = assignment.family_of(role);
    match requests
      .iter_mut()
      .find(|req| req.family_index == family_index)
    {
      Some(req) => {
        if req.queue_count < families[family_index as usize].queue_count {
          req.queue_count += 1;
        }
      }
      None => requests.push(QueueCreateRequest {
        family_index,
        queue_count: 1,
      }),
    }
  }

  requests
}

/// Queue index inside its family for every role, following the order used by
/// `queue_create_requests`. Roles beyond a family's reservation alias index 0.
fn queue_indices(
  requests: &[QueueCreateRequest],
  assignment: &QueueRoleAssignment,
) -> [u32; ROLE_COUNT] {
  let mut remaining: ArrayVec<u32, ROLE_COUNT> =
    requests.iter().map(|req| req.queue_count).collect();

  QueueRole::ALL.map(|role| {
    let family_index = assignment.family_of(role);
    let (i, req) = requests
      .iter()
      .enumerate()
      .find(|(_, req)| req.family_index == family_index)
      .expect("every role has a queue create request");

    if remaining[i] == 0 {
      return 0;
    }
    remaining[i] -= 1;
    req.queue_count - remaining[i] - 1
  })
}

/// Queue retrieved from a logical device. Only valid while the device is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Queue {
  pub handle: vk::Queue,
  pub family_index: u32,
  pub index: u32,
}

impl Queue {
  /// True if both values refer to the same native queue.
  ///
  /// Aliased queues need external synchronization when submitted to from multiple threads.
  pub fn is_aliased_with(&self, other: &Queue) -> bool {
    self.family_index == other.family_index && self.index == other.index
  }
}

pub struct Device<D: DeviceFns> {
  handle: vk::Device,
  fns: D,
  graphics: Queue,
  compute: Queue,
  present: Queue,
}

impl<D: DeviceFns> Device<D> {
  /// Creates the logical device and retrieves a queue for every role in `assignment`.
  ///
  /// `assignment` should come from `allocate_queues` on the same `physical_device`.
  pub unsafe fn new<I: InstanceFns<Device = D>>(
    physical_device: &PhysicalDevice<I>,
    extensions: &[&CStr],
    assignment: &QueueRoleAssignment,
  ) -> Result<Self, DeviceCreationError> {
    if extensions.len() > MAX_DEVICE_EXTENSIONS {
      return Err(DeviceCreationError::TooManyExtensions(extensions.len()));
    }

    let instance = physical_device.instance();
    let requests = queue_create_requests(assignment);

    let queue_create_infos: ArrayVec<vk::DeviceQueueCreateInfo, ROLE_COUNT> = requests
      .iter()
      .map(|req| {
        log::debug!(
          "Requesting {} queue(s) from family {}",
          req.queue_count,
          req.family_index
        );
        vk::DeviceQueueCreateInfo::default()
          .queue_family_index(req.family_index)
          .queue_priorities(&QUEUE_PRIORITIES[..req.queue_count as usize])
      })
      .collect();

    // required to be alive until the end of device creation
    let extension_pointers: ArrayVec<*const c_char, MAX_DEVICE_EXTENSIONS> =
      extensions.iter().map(|s| s.as_ptr()).collect();

    let features = vk::PhysicalDeviceFeatures::default();
    let create_info = vk::DeviceCreateInfo::default()
      .queue_create_infos(&queue_create_infos)
      .enabled_extension_names(&extension_pointers)
      .enabled_features(&features);

    log::info!("Creating logical device");
    let handle = instance
      .create_device(**physical_device, &create_info)
      .map_err(DeviceCreationError::DeviceCreationFailed)?;

    let fns = match instance.load_device(handle) {
      Ok(fns) => fns,
      Err(DispatchLoadError::DestroyUnavailable) => {
        log::error!("Leaking logical device {:?}, it cannot be destroyed", handle);
        return Err(DispatchLoadError::DestroyUnavailable.into());
      }
      Err(err) => {
        log::debug!("Destroying logical device after failed entry point load");
        instance.destroy_device(handle);
        return Err(err.into());
      }
    };

    log::debug!("Retrieving queues");
    let indices = queue_indices(&requests, assignment);
    let retrieve = |role: QueueRole, index: u32| {
      let family_index = assignment.family_of(role);
      log::debug!("{:?} queue: family {} index {}", role, family_index, index);
      Queue {
        handle: fns.get_device_queue(family_index, index),
        family_index,
        index,
      }
    };
    let graphics = retrieve(QueueRole::Graphics, indices[0]);
    let compute = retrieve(QueueRole::Compute, indices[1]);
    let present = retrieve(QueueRole::Present, indices[2]);

    Ok(Self {
      handle,
      fns,
      graphics,
      compute,
      present,
    })
  }

  pub fn handle(&self) -> vk::Device {
    self.handle
  }

  /// Device level entry point table.
  pub fn fns(&self) -> &D {
    &self.fns
  }

  pub fn graphics_queue(&self) -> &Queue {
    &self.graphics
  }

  pub fn compute_queue(&self) -> &Queue {
    &self.compute
  }

  pub fn present_queue(&self) -> &Queue {
    &self.present
  }

  pub fn queue(&self, role: QueueRole) -> &Queue {
    match role {
      QueueRole::Graphics => &self.graphics,
      QueueRole::Compute => &self.compute,
      QueueRole::Present => &self.present,
    }
  }

  /// Distinct families used by the device queues, in graphics, compute, present order.
  ///
  /// Resources shared between more than one of these need concurrent sharing mode.
  pub fn unique_queue_families(&self) -> BoundedSet<u32, ROLE_COUNT> {
    [&self.graphics, &self.compute, &self.present]
      .into_iter()
      .map(|queue| queue.family_index)
      .collect()
  }

  /// Destroys the device, which also invalidates every queue retrieved from it.
  pub unsafe fn destroy_self(self) {
    self.fns.destroy_device();
  }
}
