mod device_selector;
mod logical_device;
mod physical_device;
mod queues;
mod vendor;

pub use device_selector::select_physical_device;
pub use logical_device::{queue_create_requests, Device, Queue, QueueCreateRequest, ROLE_COUNT};
pub use physical_device::PhysicalDevice;
pub use queues::{allocate_queues, QueueFamilyInfo, QueueRole, QueueRoleAssignment};
pub use vendor::Vendor;
