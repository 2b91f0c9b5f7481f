//! Native overlay SDK loaded from the vendor dynamic library.
//!
//! The SDK exports a flat C ABI. Function pointers are resolved once at load
//! time and kept next to the `Library` that owns them.

use std::ffi::c_char;
use std::path::Path;

use libloading::Library;

use super::native::OverlaySdk;
use crate::error::{OverlayError, OverlayResult};

/// Size of the buffer handed to `overlay_get_status`
const STATUS_BUFFER_LEN: usize = 64;

type StartFn = unsafe extern "C" fn() -> i32;
type StopFn = unsafe extern "C" fn();
type AddWindowFn = unsafe extern "C" fn(isize) -> i32;
type RemoveWindowFn = unsafe extern "C" fn(i32) -> i32;
type SetPositionFn = unsafe extern "C" fn(i32, i32, i32, i32, i32) -> i32;
type SetTransparencyFn = unsafe extern "C" fn(i32, i32) -> i32;
type ShowFn = unsafe extern "C" fn();
type HideFn = unsafe extern "C" fn();
type StatusFn = unsafe extern "C" fn(*mut c_char, usize) -> usize;

pub struct DylibSdk {
    start: StartFn,
    stop: StopFn,
    add_window: AddWindowFn,
    remove_window: RemoveWindowFn,
    set_position: SetPositionFn,
    set_transparency: SetTransparencyFn,
    show: ShowFn,
    hide: HideFn,
    status: StatusFn,
    // Must outlive the function pointers above
    _library: Library,
}

// SAFETY: the SDK marshals every call onto its own compositor thread; the
// exported functions are documented as callable from any thread.
unsafe impl Send for DylibSdk {}

impl DylibSdk {
    /// Load the SDK from `path` and resolve every export.
    pub fn load(path: &Path) -> OverlayResult<Self> {
        // SAFETY: loading runs the library's initializers; the vendor library
        // has no load-time side effects beyond registering its window class.
        let library = unsafe { Library::new(path) }.map_err(|e| {
            OverlayError::SdkUnavailable(format!("{}: {}", path.display(), e))
        })?;

        // SAFETY: symbol types match the SDK header.
        unsafe {
            Ok(Self {
                start: symbol(&library, b"overlay_start\0")?,
                stop: symbol(&library, b"overlay_stop\0")?,
                add_window: symbol(&library, b"overlay_add_window\0")?,
                remove_window: symbol(&library, b"overlay_remove_window\0")?,
                set_position: symbol(&library, b"overlay_set_position\0")?,
                set_transparency: symbol(&library, b"overlay_set_transparency\0")?,
                show: symbol(&library, b"overlay_show\0")?,
                hide: symbol(&library, b"overlay_hide\0")?,
                status: symbol(&library, b"overlay_get_status\0")?,
                _library: library,
            })
        }
    }
}

/// Resolve one export as a plain function pointer.
unsafe fn symbol<T: Copy>(library: &Library, name: &[u8]) -> OverlayResult<T> {
    library
        .get::<T>(name)
        .map(|sym| *sym)
        .map_err(|e| {
            OverlayError::SdkUnavailable(format!(
                "missing export {}: {}",
                String::from_utf8_lossy(name).trim_end_matches('\0'),
                e
            ))
        })
}

impl OverlaySdk for DylibSdk {
    fn start(&mut self) -> i32 {
        unsafe { (self.start)() }
    }

    fn stop(&mut self) {
        unsafe { (self.stop)() }
    }

    fn add_window(&mut self, handle: isize) -> i32 {
        unsafe { (self.add_window)(handle) }
    }

    fn remove_window(&mut self, id: i32) -> i32 {
        unsafe { (self.remove_window)(id) }
    }

    fn set_position(&mut self, id: i32, x: i32, y: i32, width: i32, height: i32) -> i32 {
        unsafe { (self.set_position)(id, x, y, width, height) }
    }

    fn set_transparency(&mut self, id: i32, alpha: i32) -> i32 {
        unsafe { (self.set_transparency)(id, alpha) }
    }

    fn show(&mut self) {
        unsafe { (self.show)() }
    }

    fn hide(&mut self) {
        unsafe { (self.hide)() }
    }

    fn status(&mut self) -> String {
        let mut buffer = [0u8; STATUS_BUFFER_LEN];
        // SAFETY: the SDK writes at most `len` bytes and returns the count.
        let written = unsafe { (self.status)(buffer.as_mut_ptr() as *mut c_char, buffer.len()) };
        // Terminator bytes are left in place; CompositorStatus::parse strips them.
        String::from_utf8_lossy(&buffer[..written.min(buffer.len())]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = DylibSdk::load(&dir.path().join("no_such_overlay_sdk.so"));
        assert!(matches!(result, Err(OverlayError::SdkUnavailable(_))));
    }
}
