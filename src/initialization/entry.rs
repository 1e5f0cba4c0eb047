use super::InstanceCreationError;

#[cfg(all(feature = "link", feature = "load"))]
compile_error!(
  "\
    Features \"link\" and \"load\" \
    were included at the same time. \
    Choose between \"load\" to load the Vulkan library \
    at runtime or \"link\" to link it while building the binary."
);

#[cfg(not(any(feature = "link", feature = "load")))]
compile_error!(
  "\
    No feature was included for accessing the Vulkan library. \
    Choose between \"load\" to load the Vulkan library \
    at runtime or \"link\" to link it while building the binary."
);

#[cfg(feature = "link")]
pub unsafe fn get_entry() -> Result<ash::Entry, InstanceCreationError> {
  Ok(ash::Entry::linked())
}

#[cfg(feature = "load")]
pub unsafe fn get_entry() -> Result<ash::Entry, InstanceCreationError> {
  ash::Entry::load().map_err(|err| {
    let reason = match err {
      ash::LoadingError::MissingEntryPoint(missing_entry_error) => format!(
        "Missing entry point when loading Vulkan library: {}",
        missing_entry_error
      ),
      ash::LoadingError::LibraryLoadFailure(load_error) => {
        format!("Failed to load Vulkan Library: {:?}", load_error)
      }
    };
    InstanceCreationError::LibraryLoadFailed(reason)
  })
}
