//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`SettingsPort`]: the door position is stored as a single
//! byte under namespace `solepod`, key `doorPos`.
//!
//! - **`target_os = "espidf"`**: ESP-IDF NVS, one `nvs_commit()` per save
//!   (atomic per commit).
//! - **otherwise**: an in-memory map for host tests and simulation.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::app::ports::{SettingsPort, StorageError};
use crate::fsm::DoorPosition;

const SETTINGS_NAMESPACE: &str = "solepod";
const DOOR_POSITION_KEY: &str = "doorPos";

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<String, u8>,
}

impl NvsAdapter {
    /// Initialise NVS flash.  On first boot or after a version mismatch the
    /// partition is erased and re-initialised.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as i32 || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as i32 {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK as i32 {
                    return Err(StorageError::Unavailable);
                }
                if unsafe { nvs_flash_init() } != ESP_OK as i32 {
                    return Err(StorageError::Unavailable);
                }
            } else if ret != ESP_OK as i32 {
                return Err(StorageError::Unavailable);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: HashMap::new(),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Overwrite the stored byte without validation (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_write_raw(&mut self, raw: u8) {
        self.store
            .insert(Self::composite_key(SETTINGS_NAMESPACE, DOOR_POSITION_KEY), raw);
    }

    /// Open an NVS namespace, run `f` with the handle, then close it.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut ns_buf = [0u8; 16];
        let ns_bytes = namespace.as_bytes();
        let len = ns_bytes.len().min(15);
        ns_buf[..len].copy_from_slice(&ns_bytes[..len]);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        // SAFETY: ns_buf is NUL-terminated; handle is a valid out-pointer.
        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(ret);
        }

        let result = f(handle);
        // SAFETY: handle was opened above and is not used after this.
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

impl SettingsPort for NvsAdapter {
    fn load_door_position(&self) -> Result<Option<u8>, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(SETTINGS_NAMESPACE, DOOR_POSITION_KEY);
            Ok(self.store.get(&key).copied())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(SETTINGS_NAMESPACE, false, |handle| {
                let key_cstr = b"doorPos\0";
                let mut raw: u8 = 0;
                // SAFETY: key is NUL-terminated; raw is a valid out-pointer.
                let ret = unsafe { nvs_get_u8(handle, key_cstr.as_ptr() as *const _, &mut raw) };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                Ok(raw)
            });
            match result {
                Ok(raw) => {
                    info!("NvsAdapter: {}::{} = {}", SETTINGS_NAMESPACE, DOOR_POSITION_KEY, raw);
                    Ok(Some(raw))
                }
                // A namespace that was never written cannot be opened read-only.
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND as i32 => Ok(None),
                Err(e) => {
                    warn!("NvsAdapter: NVS read error {}", e);
                    Err(StorageError::IoError)
                }
            }
        }
    }

    fn save_door_position(&mut self, position: DoorPosition) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(SETTINGS_NAMESPACE, DOOR_POSITION_KEY);
            self.store.insert(key, position.percent());
            info!("NvsAdapter: door position {} saved (simulation)", position);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(SETTINGS_NAMESPACE, true, |handle| {
                let key_cstr = b"doorPos\0";
                // SAFETY: key is NUL-terminated; handle is open read-write.
                let ret = unsafe { nvs_set_u8(handle, key_cstr.as_ptr() as *const _, position.percent()) };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                // SAFETY: as above.
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK as i32 {
                    return Err(ret);
                }
                Ok(())
            });
            match result {
                Ok(()) => {
                    info!("NvsAdapter: door position {} saved to NVS", position);
                    Ok(())
                }
                Err(e) if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE as i32 => Err(StorageError::Full),
                Err(e) => {
                    warn!("NvsAdapter: NVS write error {}", e);
                    Err(StorageError::IoError)
                }
            }
        }
    }
}
