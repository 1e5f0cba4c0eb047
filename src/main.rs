use std::process::ExitCode;

use device_bringup::{
  device::{select_physical_device, Device, QueueRole},
  errors::InitializationError,
  initialization::{self, HeadlessSurface},
  native::{InstanceFns, VulkanInstance},
  REQUIRED_DEVICE_EXTENSIONS,
};

fn bring_up_device<I: InstanceFns>(
  instance: &I,
  surface: &HeadlessSurface,
) -> Result<Device<I::Device>, InitializationError> {
  let (physical_device, assignment) =
    select_physical_device(instance, **surface, &REQUIRED_DEVICE_EXTENSIONS)?
      .ok_or(InitializationError::NoCompatibleDevices)?;
  log::info!("Using physical device {:?}", physical_device.name());

  let device = unsafe { Device::new(&physical_device, &REQUIRED_DEVICE_EXTENSIONS, &assignment)? };
  // the family table is only needed during creation
  drop(assignment);

  for role in QueueRole::ALL {
    let queue = device.queue(role);
    log::info!(
      "{:?} queue: family {}, index {}",
      role,
      queue.family_index,
      queue.index
    );
  }
  log::info!(
    "Queue families in use: {:?}",
    device.unique_queue_families().as_slice()
  );
  if device
    .graphics_queue()
    .is_aliased_with(device.compute_queue())
  {
    log::warn!("Graphics and compute share a queue, submissions will be serialized");
  }

  Ok(device)
}

fn run(entry: &ash::Entry, instance: &VulkanInstance) -> Result<(), InitializationError> {
  let surface =
    HeadlessSurface::new(entry, instance).map_err(InitializationError::SurfaceCreationFailed)?;

  let result = bring_up_device(instance, &surface).and_then(|device| unsafe {
    // wait until all operations have finished and the device is safe to destroy
    let idle = device.fns().device_wait_idle();

    // destroying a logical device also implicitly destroys all associated queues
    log::debug!("Destroying logical device");
    device.destroy_self();
    idle.map_err(InitializationError::from)
  });

  log::debug!("Destroying surface");
  unsafe { surface.destroy_self(instance) };

  result
}

fn main() -> ExitCode {
  env_logger::init();

  let entry = match unsafe { initialization::get_entry() } {
    Ok(entry) => entry,
    Err(err) => {
      log::error!("{:?}", InitializationError::from(err));
      return ExitCode::FAILURE;
    }
  };

  #[cfg(feature = "vl")]
  let instance = initialization::create_instance(&entry);
  #[cfg(not(feature = "vl"))]
  let instance = initialization::create_instance(&entry).map(|instance| (instance, ()));

  let (instance, _debug_utils) = match instance {
    Ok(v) => v,
    Err(err) => {
      log::error!("{:?}", InitializationError::from(err));
      return ExitCode::FAILURE;
    }
  };

  let result = run(&entry, &instance);

  unsafe {
    #[cfg(feature = "vl")]
    {
      log::debug!("Destroying debug utils messenger");
      _debug_utils.destroy_self();
    }

    log::debug!("Destroying instance");
    instance.destroy_self();
  }

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      log::error!("{:?}", err);
      ExitCode::FAILURE
    }
  }
}
