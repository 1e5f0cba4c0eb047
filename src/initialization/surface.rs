use std::ops::Deref;

use ash::vk;

use crate::native::VulkanInstance;

// Surface that is not backed by a window, enough to check presentation support
pub struct HeadlessSurface {
  inner: vk::SurfaceKHR,
}

impl Deref for HeadlessSurface {
  type Target = vk::SurfaceKHR;

  fn deref(&self) -> &Self::Target {
    &self.inner
  }
}

impl HeadlessSurface {
  pub fn new(entry: &ash::Entry, instance: &VulkanInstance) -> Result<Self, vk::Result> {
    let loader = ash::ext::headless_surface::Instance::new(entry, instance);
    log::debug!("Creating headless surface");
    let inner = unsafe {
      loader.create_headless_surface(&vk::HeadlessSurfaceCreateInfoEXT::default(), None)?
    };
    Ok(Self { inner })
  }

  pub unsafe fn destroy_self(&self, instance: &VulkanInstance) {
    instance.surface_loader().destroy_surface(self.inner, None);
  }
}
