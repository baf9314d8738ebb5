//! Pointer metadata transplanting for unsized boxes.

use core::ptr::addr_of_mut;

/// Returns `ptr`'s address carrying `meta`'s metadata (slice length or vtable).
#[allow(clippy::as_conversions)]
pub fn with_metadata_of_mut<T: ?Sized, U: ?Sized>(ptr: *mut T, mut meta: *const U) -> *mut U {
    let meta_ptr = addr_of_mut!(meta).cast::<usize>();
    unsafe { meta_ptr.write(ptr.cast::<u8>() as usize) }
    meta.cast_mut()
}
