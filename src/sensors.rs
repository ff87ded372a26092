//! Motion sensor permission handshake
//!
//! iOS exposes `DeviceOrientationEvent.requestPermission` /
//! `DeviceMotionEvent.requestPermission` as static methods that must be
//! called from a user gesture; neither is covered by `web-sys`, so they
//! are bound with inline JS. Everywhere else the orientation events just
//! fire and the request resolves `Unavailable`.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// Result of the one-shot permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    /// User granted sensor access
    Granted,
    /// User declined; pointer fallback stays active
    Denied,
    /// No permission API on this platform (or insecure origin)
    Unavailable,
}

impl PermissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionOutcome::Granted => "granted",
            PermissionOutcome::Denied => "denied",
            PermissionOutcome::Unavailable => "unavailable",
        }
    }

    fn from_js(value: &JsValue) -> Self {
        match value.as_string().as_deref() {
            Some("granted") => PermissionOutcome::Granted,
            Some("denied") => PermissionOutcome::Denied,
            _ => PermissionOutcome::Unavailable,
        }
    }
}

// JS binding for the permission request
#[wasm_bindgen(inline_js = "
    export function request_motion_permission_js() {
        const secure = location.protocol === 'https:' || location.hostname === 'localhost';
        const prompts = [];
        if (typeof DeviceMotionEvent !== 'undefined' &&
            typeof DeviceMotionEvent.requestPermission === 'function') {
            prompts.push(DeviceMotionEvent.requestPermission());
        }
        if (typeof DeviceOrientationEvent !== 'undefined' &&
            typeof DeviceOrientationEvent.requestPermission === 'function') {
            prompts.push(DeviceOrientationEvent.requestPermission());
        }
        if (!secure || prompts.length === 0) {
            return Promise.resolve('unavailable');
        }
        return Promise.allSettled(prompts).then(results =>
            results.some(r => r.status === 'fulfilled' && r.value === 'granted')
                ? 'granted'
                : 'denied');
    }
")]
extern "C" {
    fn request_motion_permission_js() -> js_sys::Promise;
}

/// Request motion/orientation permission. Call from a user gesture.
///
/// Resolves once; there is no timeout and no cancellation. Repeat calls
/// are harmless (the browser remembers the answer).
pub async fn request_motion_permission() -> PermissionOutcome {
    match JsFuture::from(request_motion_permission_js()).await {
        Ok(value) => PermissionOutcome::from_js(&value),
        Err(_) => PermissionOutcome::Denied,
    }
}
