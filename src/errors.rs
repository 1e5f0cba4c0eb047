use std::ffi::CStr;

use ash::vk;

use crate::initialization::InstanceCreationError;

pub fn error_chain_fmt(
  e: &impl std::error::Error,
  f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
  writeln!(f, "{}\nCauses:", e)?;
  let mut current = e.source();
  while let Some(cause) = current {
    writeln!(f, "  {}", cause)?;
    current = cause.source();
  }
  Ok(())
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueAllocationError {
  #[error("No queue family supports graphics operations")]
  NoGraphicsQueue,
  #[error("No queue family supports compute operations")]
  NoComputeQueue,
  #[error("No queue family supports presentation to the target surface")]
  NoPresentQueue,
  #[error("Vulkan API error")]
  ApiError(#[source] vk::Result),
}

impl From<vk::Result> for QueueAllocationError {
  fn from(value: vk::Result) -> Self {
    QueueAllocationError::ApiError(value)
  }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchLoadError {
  #[error("Device entry point {0:?} could not be resolved")]
  MissingEntryPoint(&'static CStr),
  // the device can't be destroyed either
  #[error("vkDestroyDevice could not be resolved")]
  DestroyUnavailable,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCreationError {
  #[error("Failed to create logical device")]
  DeviceCreationFailed(#[source] vk::Result),
  #[error("{0} device extensions requested, at most {max} are supported", max = crate::MAX_DEVICE_EXTENSIONS)]
  TooManyExtensions(usize),
  #[error("Failed to load the logical device entry point table")]
  DispatchLoadFailed(#[source] DispatchLoadError),
}

impl From<DispatchLoadError> for DeviceCreationError {
  fn from(value: DispatchLoadError) -> Self {
    DeviceCreationError::DispatchLoadFailed(value)
  }
}

#[derive(thiserror::Error)]
pub enum InitializationError {
  #[error("Instance creation failed")]
  InstanceCreationFailed(#[source] InstanceCreationError),

  #[error("Failed to create the target surface")]
  SurfaceCreationFailed(#[source] vk::Result),

  #[error("No physical device supports the application")]
  NoCompatibleDevices,

  #[error("Failed to assign queue roles")]
  QueueAllocationFailed(#[source] QueueAllocationError),

  #[error("Logical device creation failed")]
  DeviceCreationFailed(#[source] DeviceCreationError),

  #[error("Vulkan API error")]
  ApiError(#[source] vk::Result),
}

impl std::fmt::Debug for InitializationError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    error_chain_fmt(self, f)
  }
}

impl From<InstanceCreationError> for InitializationError {
  fn from(value: InstanceCreationError) -> Self {
    InitializationError::InstanceCreationFailed(value)
  }
}

impl From<QueueAllocationError> for InitializationError {
  fn from(value: QueueAllocationError) -> Self {
    InitializationError::QueueAllocationFailed(value)
  }
}

impl From<DeviceCreationError> for InitializationError {
  fn from(value: DeviceCreationError) -> Self {
    InitializationError::DeviceCreationFailed(value)
  }
}

impl From<vk::Result> for InitializationError {
  fn from(value: vk::Result) -> Self {
    InitializationError::ApiError(value)
  }
}
