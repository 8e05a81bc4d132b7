use wasm_bindgen::prelude::*;

#[wasm_bindgen(inline_js = r#"
export function is_extension() {
  return typeof chrome !== 'undefined' && !!(chrome.runtime && chrome.runtime.id);
}

function lastErrorOr(resolve, reject, value) {
  if (chrome.runtime && chrome.runtime.lastError) {
    reject(chrome.runtime.lastError.message);
  } else {
    resolve(value);
  }
}

export function extension_storage_get(key) {
  return new Promise((resolve, reject) => {
    chrome.storage.local.get([key], (items) => {
      const value = items && typeof items[key] === 'string' ? items[key] : null;
      lastErrorOr(resolve, reject, value);
    });
  });
}

export function extension_storage_set(key, value) {
  return new Promise((resolve, reject) => {
    chrome.storage.local.set({ [key]: value }, () => lastErrorOr(resolve, reject, null));
  });
}

export function extension_storage_remove(key) {
  return new Promise((resolve, reject) => {
    chrome.storage.local.remove(key, () => lastErrorOr(resolve, reject, null));
  });
}
"#)]
extern "C" {
    pub fn is_extension() -> bool;
    pub fn extension_storage_get(key: &str) -> js_sys::Promise;
    pub fn extension_storage_set(key: &str, value: &str) -> js_sys::Promise;
    pub fn extension_storage_remove(key: &str) -> js_sys::Promise;
}
