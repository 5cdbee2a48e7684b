mod device;

pub use device::{
    is_block_device, is_block_device_empty, is_block_device_empty_with, open_block_device,
    scan_block_device, scan_path,
};
