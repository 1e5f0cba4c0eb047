use ash::vk;
use std::ffi::{c_char, c_void, CStr};

use crate::{
  native::VulkanInstance, utility, APPLICATION_NAME, APPLICATION_VERSION,
  REQUIRED_INSTANCE_EXTENSIONS, TARGET_API_VERSION,
};

#[derive(thiserror::Error, Debug)]
pub enum InstanceCreationError {
  #[error("{0}")]
  LibraryLoadFailed(String),

  #[error("Vulkan implementation API maximum supported version ({0}) is less than the one targeted by the application ({1})")]
  UnsupportedApiVersion(String, String),

  #[error("Missing instance extension {0:?}")]
  MissingExtension(&'static CStr),

  #[error("Failed to create an instance")]
  Failed(#[source] vk::Result),
}

fn check_api_version(entry: &ash::Entry) -> Result<(), InstanceCreationError> {
  let max_supported_version = match unsafe { entry.try_enumerate_instance_version() } {
    // Vulkan 1.1+
    Ok(Some(version)) => version,
    // Vulkan 1.0
    Ok(None) | Err(_) => vk::API_VERSION_1_0,
  };

  log::info!(
    "Vulkan library max supported version: {}",
    utility::parse_vulkan_api_version(max_supported_version)
  );

  if max_supported_version < TARGET_API_VERSION {
    return Err(InstanceCreationError::UnsupportedApiVersion(
      utility::parse_vulkan_api_version(max_supported_version),
      utility::parse_vulkan_api_version(TARGET_API_VERSION),
    ));
  }

  Ok(())
}

fn check_extensions(
  entry: &ash::Entry,
  extensions: &[&'static CStr],
) -> Result<(), InstanceCreationError> {
  log::info!("Required instance extensions: {:?}", extensions);
  let available = unsafe { entry.enumerate_instance_extension_properties(None) }
    .map_err(InstanceCreationError::Failed)?;

  for &extension in extensions {
    if !available
      .iter()
      .filter_map(|av| utility::c_char_array_as_cstr(&av.extension_name).ok())
      .any(|av| av == extension)
    {
      return Err(InstanceCreationError::MissingExtension(extension));
    }
  }

  Ok(())
}

fn app_info<'a>() -> vk::ApplicationInfo<'a> {
  vk::ApplicationInfo::default()
    .api_version(TARGET_API_VERSION)
    .application_name(APPLICATION_NAME)
    .application_version(APPLICATION_VERSION)
    .engine_version(vk::make_api_version(0, 1, 0, 0))
}

#[cfg(feature = "vl")]
pub fn create_instance(
  entry: &ash::Entry,
) -> Result<(VulkanInstance, super::DebugUtils), InstanceCreationError> {
  use std::ptr::addr_of;

  use crate::{initialization::validation_layers, ADDITIONAL_VALIDATION_FEATURES};

  let mut extensions = REQUIRED_INSTANCE_EXTENSIONS.to_vec();
  extensions.push(ash::ext::debug_utils::NAME);

  // validation layers are skipped if not available
  let layers = validation_layers::get_supported_validation_layers(entry)
    .map_err(InstanceCreationError::Failed)?;
  let layer_pointers: Vec<*const c_char> = layers.iter().map(|name| name.as_ptr()).collect();

  let debug_create_info = super::DebugUtils::get_debug_messenger_create_info();

  // enable some additional validation by passing a ValidationFeaturesEXT struct
  let mut additional_features = vk::ValidationFeaturesEXT::default()
    .enabled_validation_features(&ADDITIONAL_VALIDATION_FEATURES);
  additional_features.p_next = addr_of!(debug_create_info) as *const c_void;
  let p_next = if layers.is_empty() {
    addr_of!(debug_create_info) as *const c_void
  } else {
    addr_of!(additional_features) as *const c_void
  };

  let instance = create_instance_checked(entry, &extensions, &layer_pointers, p_next)?;

  log::debug!("Creating debug utils messenger");
  let debug_utils = match super::DebugUtils::create(entry, &instance, debug_create_info) {
    Ok(debug_utils) => debug_utils,
    Err(err) => {
      unsafe { instance.destroy_self() };
      return Err(InstanceCreationError::Failed(err));
    }
  };

  Ok((instance, debug_utils))
}

#[cfg(not(feature = "vl"))]
pub fn create_instance(entry: &ash::Entry) -> Result<VulkanInstance, InstanceCreationError> {
  create_instance_checked(entry, &REQUIRED_INSTANCE_EXTENSIONS, &[], std::ptr::null())
}

// check api version and extensions and then create a vk instance
fn create_instance_checked(
  entry: &ash::Entry,
  extensions: &[&'static CStr],
  layers: &[*const c_char],
  p_next: *const c_void,
) -> Result<VulkanInstance, InstanceCreationError> {
  check_api_version(entry)?;
  check_extensions(entry, extensions)?;

  let app_info = app_info();
  let extension_pointers: Vec<*const c_char> = extensions.iter().map(|e| e.as_ptr()).collect();
  let mut create_info = vk::InstanceCreateInfo::default()
    .application_info(&app_info)
    .enabled_extension_names(&extension_pointers)
    .enabled_layer_names(layers);
  create_info.p_next = p_next;

  log::debug!("Creating instance");
  let instance = unsafe { entry.create_instance(&create_info, None) }
    .map_err(InstanceCreationError::Failed)?;

  Ok(VulkanInstance::new(entry, instance))
}
