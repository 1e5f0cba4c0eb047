use ash::vk;

use std::{ffi::CStr, os::raw::c_void};

use crate::{utility, VALIDATION_LAYERS};

// splits VALIDATION_LAYERS into available and unavailable layers
fn filter_supported(
  available: &[vk::LayerProperties],
) -> (Vec<&'static CStr>, Vec<&'static CStr>) {
  VALIDATION_LAYERS.into_iter().partition(|&req| {
    available
      .iter()
      .filter_map(|av| utility::c_char_array_as_cstr(&av.layer_name).ok())
      .any(|av| av == req)
  })
}

// returns the subset of VALIDATION_LAYERS that is available
pub fn get_supported_validation_layers(
  entry: &ash::Entry,
) -> Result<Box<[&'static CStr]>, vk::Result> {
  log::info!("Querying Vulkan instance layers");
  let properties = unsafe { entry.enumerate_instance_layer_properties() }?;
  let (available, unavailable) = filter_supported(&properties);

  if !unavailable.is_empty() {
    log::error!(
      "Some requested validation layers are not available: {:?}",
      unavailable
    );
  }

  Ok(available.into_boxed_slice())
}

fn log_level(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> log::Level {
  if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
    log::Level::Error
  } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
    log::Level::Warn
  } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
    log::Level::Info
  } else {
    log::Level::Debug
  }
}

fn message_kind(message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> &'static str {
  if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION) {
    "validation"
  } else if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE) {
    "performance"
  } else {
    "general"
  }
}

// forwards driver and layer messages to the log facade
unsafe extern "system" fn forward_to_log(
  severity: vk::DebugUtilsMessageSeverityFlagsEXT,
  message_type: vk::DebugUtilsMessageTypeFlagsEXT,
  callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
  _user_data: *mut c_void,
) -> vk::Bool32 {
  let message = match callback_data.as_ref() {
    Some(data) if !data.p_message.is_null() => CStr::from_ptr(data.p_message).to_string_lossy(),
    _ => "<no message>".into(),
  };
  log::log!(
    target: "vulkan",
    log_level(severity),
    "[{}] {}",
    message_kind(message_type),
    message
  );

  // never abort the call that triggered the message
  vk::FALSE
}

/// Debug messenger that lives as long as the instance it was created on.
pub struct DebugUtils {
  loader: ash::ext::debug_utils::Instance,
  messenger: vk::DebugUtilsMessengerEXT,
}

impl DebugUtils {
  pub fn create(
    entry: &ash::Entry,
    instance: &ash::Instance,
    create_info: vk::DebugUtilsMessengerCreateInfoEXT,
  ) -> Result<Self, vk::Result> {
    let loader = ash::ext::debug_utils::Instance::new(entry, instance);
    let messenger = unsafe { loader.create_debug_utils_messenger(&create_info, None)? };
    Ok(Self { loader, messenger })
  }

  /// Also chained into instance creation so that messages from `vkCreateInstance` are caught.
  pub fn get_debug_messenger_create_info<'a>() -> vk::DebugUtilsMessengerCreateInfoEXT<'a> {
    vk::DebugUtilsMessengerCreateInfoEXT::default()
      .message_severity(
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
          | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
          | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
          | vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE,
      )
      .message_type(
        vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
          | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
          | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
      )
      .pfn_user_callback(Some(forward_to_log))
  }

  pub unsafe fn destroy_self(&self) {
    self
      .loader
      .destroy_debug_utils_messenger(self.messenger, None);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn layer(name: &CStr) -> vk::LayerProperties {
    let mut props = vk::LayerProperties::default();
    for (d, s) in props.layer_name.iter_mut().zip(name.to_bytes_with_nul()) {
      *d = *s as _;
    }
    props
  }

  #[test]
  fn unavailable_layers_are_split_off() {
    let (available, unavailable) = filter_supported(&[layer(c"VK_LAYER_other")]);
    assert!(available.is_empty());
    assert_eq!(unavailable, VALIDATION_LAYERS);

    let (available, unavailable) = filter_supported(&[layer(VALIDATION_LAYERS[0])]);
    assert_eq!(available, VALIDATION_LAYERS);
    assert!(unavailable.is_empty());
  }

  #[test]
  fn messages_map_to_log_levels() {
    type Severity = vk::DebugUtilsMessageSeverityFlagsEXT;
    assert_eq!(log_level(Severity::ERROR), log::Level::Error);
    assert_eq!(log_level(Severity::WARNING), log::Level::Warn);
    assert_eq!(log_level(Severity::INFO), log::Level::Info);
    assert_eq!(log_level(Severity::VERBOSE), log::Level::Debug);
    assert_eq!(log_level(Severity::VERBOSE | Severity::ERROR), log::Level::Error);

    type Kind = vk::DebugUtilsMessageTypeFlagsEXT;
    assert_eq!(message_kind(Kind::VALIDATION | Kind::GENERAL), "validation");
    assert_eq!(message_kind(Kind::PERFORMANCE), "performance");
    assert_eq!(message_kind(Kind::empty()), "general");
  }

  #[test]
  fn messenger_forwards_every_severity() {
    let info = DebugUtils::get_debug_messenger_create_info();
    assert!(info.message_severity.contains(
      vk::DebugUtilsMessageSeverityFlagsEXT::ERROR | vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
    ));
    assert!(info.pfn_user_callback.is_some());
  }
}
