//! C FFI: bridges [`Transcriber`] to iOS / Android callers.
//!
//! Functions are `#[no_mangle] extern "C"` so Swift / Kotlin can call them
//! through a thin bridging header without any Objective-C wrapper.
//!
//! ## Memory contract
//!
//! | Function                   | Caller frees with          |
//! |----------------------------|----------------------------|
//! | [`ipa_transcriber_new`]    | [`ipa_transcriber_free`]   |
//! | [`ipa_transcribe`] (`out`) | [`ipa_free_string`]        |
//! | [`ipa_transcribe`] (error) | [`ipa_free_error`]         |

use std::ffi::{c_char, CStr, CString};
use std::sync::Arc;

use crate::dictionary::PhoneticDictionary;
use crate::g2p::FallbackG2p;
use crate::transcriber::Transcriber;

// ─────────────────────────────────────────────────────────────────────────────

/// Opaque handle to a transcriber.
pub struct IpaTranscriberHandle {
    transcriber: Transcriber,
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Convert a non-null `*const c_char` to an owned `String`.
/// Returns `None` if `ptr` is null; invalid UTF-8 is replaced lossily.
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Heap-allocate an owned C string.  Returns null on interior nul bytes.
fn to_c_str(s: &str) -> *const c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => std::ptr::null(),
    }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Create a transcriber using the bundled dictionary.
///
/// @param g2p_table_path  UTF-8 path to the G2P table, or `NULL` to use the
///                        default location (`$IPA_G2P_TABLE`, then the system
///                        path).  A missing table is not an error: unknown
///                        words are returned as written.
/// @return                Opaque handle.  Free with [`ipa_transcriber_free`].
#[no_mangle]
pub unsafe extern "C" fn ipa_transcriber_new(g2p_table_path: *const c_char) -> *mut IpaTranscriberHandle {
    let g2p = match unsafe { cstr_to_string(g2p_table_path) } {
        Some(path) => FallbackG2p::from_path(path),
        None => FallbackG2p::from_default_location(),
    };
    // Load now so the first transcription call does not pay for it.
    g2p.preload();
    let transcriber = Transcriber::new(
        PhoneticDictionary::shared(),
        Arc::new(g2p),
    );
    Box::into_raw(Box::new(IpaTranscriberHandle { transcriber }))
}

/// Transcribe `text` to IPA.
///
/// @param handle          Handle from [`ipa_transcriber_new`].
/// @param text            UTF-8 English text (may span several lines).
/// @param accent          `"rp"` or `"american"`.
/// @param use_weak_forms  Apply weak forms of function words.
/// @param out             On success receives a heap-allocated UTF-8 IPA
///                        string; free it with [`ipa_free_string`].
/// @return                `NULL` on success; on failure a heap-allocated UTF-8
///                        error message that the caller must release with
///                        [`ipa_free_error`].
#[no_mangle]
pub unsafe extern "C" fn ipa_transcribe(
    handle: *const IpaTranscriberHandle,
    text: *const c_char,
    accent: *const c_char,
    use_weak_forms: bool,
    out: *mut *const c_char,
) -> *const c_char {
    macro_rules! bail {
        ($msg:literal) => {
            return to_c_str($msg);
        };
        ($fmt:expr, $($arg:tt)*) => {
            return to_c_str(&format!($fmt, $($arg)*));
        };
    }

    if handle.is_null() {
        bail!("null transcriber handle");
    }
    if out.is_null() {
        bail!("null output pointer");
    }
    let (Some(txt), Some(acc)) = (unsafe { cstr_to_string(text) }, unsafe { cstr_to_string(accent) })
    else {
        bail!("null argument (text or accent)");
    };

    let h = unsafe { &*handle };
    match h.transcriber.transcribe(&txt, &acc, use_weak_forms) {
        Ok(ipa) => {
            let ptr = to_c_str(&ipa);
            if ptr.is_null() {
                bail!("transcription of {:?} contains a nul byte", txt);
            }
            unsafe { *out = ptr };
            std::ptr::null()
        }
        Err(e) => to_c_str(&e.to_string()),
    }
}

/// Free a string written to `out` by [`ipa_transcribe`].
#[no_mangle]
pub unsafe extern "C" fn ipa_free_string(s: *const c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s as *mut c_char) });
    }
}

/// Free an error string returned by [`ipa_transcribe`].
#[no_mangle]
pub unsafe extern "C" fn ipa_free_error(s: *const c_char) {
    unsafe { ipa_free_string(s) };
}

/// Destroy a transcriber handle and release all resources.
#[no_mangle]
pub unsafe extern "C" fn ipa_transcriber_free(handle: *mut IpaTranscriberHandle) {
    if !handle.is_null() {
        drop(unsafe { Box::from_raw(handle) });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
