//! Layer configuration.
//!
//! Settings are read once per instance, at `vkCreateInstance`. The TOML file named by
//! `VVL_SETTINGS_PATH` (or `vvl_settings.toml` in the working directory) is loaded first, then
//! environment variables override individual values:
//!
//! | variable                      | effect                                              |
//! |-------------------------------|-----------------------------------------------------|
//! | `VVL_ENABLES`                 | comma separated validators to turn on               |
//! | `VVL_DISABLES`                | comma separated validators to turn off              |
//! | `VVL_MESSAGE_ID_FILTER`       | comma separated VUIDs or hex message ids to mute    |
//! | `VVL_DUPLICATE_MESSAGE_LIMIT` | how often one VUID is reported, `0` for no limit    |
//! | `VVL_LOG`                     | `env_logger` filter for the layer's own log output  |
//!
//! Validator names are `core`, `object_lifetimes`, `thread_safety` and `best_practices`.
//!
//! Last, an application can pass a `VkLayerSettingsCreateInfoEXT` to `vkCreateInstance`. Its
//! settings for this layer (`enables`, `disables`, `message_id_filter` as string arrays and
//! `duplicate_message_limit` as a `uint32`) override both the file and the environment.

use crate::{
    ffi::{chain_iter, slice_from},
    layer::LAYER_NAME,
};
use ash::vk;
use foldhash::HashMap;
use serde::Deserialize;
use std::{
    env,
    ffi::{c_char, c_void, CStr},
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Name of the settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "vvl_settings.toml";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub enables: Enables,
    /// VUIDs (`VUID-vkCmdDraw-None-08606`) or message ids (`0x3430a94e`) that are never
    /// reported.
    pub message_id_filter: Vec<String>,
    /// How many times the same VUID is reported before it is muted. `0` means no limit.
    pub duplicate_message_limit: u32,
    pub report_flags: ReportFlags,
    /// Filter for the layer's own log output, in `env_logger` syntax.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            enables: Enables::default(),
            message_id_filter: Vec::new(),
            duplicate_message_limit: 10,
            report_flags: ReportFlags::default(),
            log_filter: "warn".to_owned(),
        }
    }
}

/// Which validators are created for each instance and device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Enables {
    pub core: bool,
    pub object_lifetimes: bool,
    pub thread_safety: bool,
    pub best_practices: bool,
}

impl Default for Enables {
    fn default() -> Self {
        Enables {
            core: true,
            object_lifetimes: true,
            thread_safety: true,
            best_practices: false,
        }
    }
}

impl Enables {
    fn set(&mut self, name: &str, value: bool) -> Result<(), SettingsError> {
        let flag = match name {
            "core" => &mut self.core,
            "object_lifetimes" => &mut self.object_lifetimes,
            "thread_safety" => &mut self.thread_safety,
            "best_practices" => &mut self.best_practices,
            _ => {
                return Err(SettingsError::InvalidValue {
                    name: if value { "VVL_ENABLES" } else { "VVL_DISABLES" },
                    value: name.to_owned(),
                });
            }
        };
        *flag = value;

        Ok(())
    }
}

/// Which message severities are reported at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportFlags {
    pub error: bool,
    pub warning: bool,
    pub performance: bool,
    pub info: bool,
}

impl Default for ReportFlags {
    fn default() -> Self {
        ReportFlags {
            error: true,
            warning: true,
            performance: true,
            info: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value `{value}` for `{name}`")]
    InvalidValue { name: &'static str, value: String },
}

impl Settings {
    /// Loads the settings from the environment, falling back to the defaults when they can't be
    /// read.
    pub fn load() -> Self {
        match Settings::from_environment() {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("using default layer settings: {}", error_chain(&err));
                Settings::default()
            }
        }
    }

    /// Reads the settings file and applies the environment overrides.
    pub fn from_environment() -> Result<Self, SettingsError> {
        let mut settings = match env::var_os("VVL_SETTINGS_PATH") {
            Some(path) => Settings::from_file(path)?,
            None if Path::new(DEFAULT_SETTINGS_FILE).is_file() => {
                Settings::from_file(DEFAULT_SETTINGS_FILE)?
            }
            None => Settings::default(),
        };
        settings.apply_overrides(|name| env::var(name).ok())?;

        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_owned(),
            source,
        })?;

        Settings::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies overrides looked up through `var`, which maps a variable name to its value.
    pub fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SettingsError> {
        if let Some(value) = var("VVL_ENABLES") {
            for name in split_list(&value) {
                self.enables.set(name, true)?;
            }
        }

        if let Some(value) = var("VVL_DISABLES") {
            for name in split_list(&value) {
                self.enables.set(name, false)?;
            }
        }

        if let Some(value) = var("VVL_MESSAGE_ID_FILTER") {
            self.message_id_filter
                .extend(split_list(&value).map(str::to_owned));
        }

        if let Some(value) = var("VVL_DUPLICATE_MESSAGE_LIMIT") {
            self.duplicate_message_limit =
                value
                    .trim()
                    .parse()
                    .map_err(|_| SettingsError::InvalidValue {
                        name: "VVL_DUPLICATE_MESSAGE_LIMIT",
                        value: value.clone(),
                    })?;
        }

        if let Some(value) = var("VVL_LOG") {
            self.log_filter = value;
        }

        Ok(())
    }
}

impl Settings {
    /// Applies the settings for this layer found in a `VkLayerSettingsCreateInfoEXT` in the
    /// `pNext` chain of `VkInstanceCreateInfo`.
    ///
    /// # Safety
    ///
    /// - `p_next` must be null or a valid structure chain.
    pub unsafe fn apply_layer_settings(
        &mut self,
        p_next: *const c_void,
    ) -> Result<(), SettingsError> {
        let mut values: HashMap<&'static str, String> = HashMap::default();

        for create_info in unsafe {
            chain_iter::<vk::LayerSettingsCreateInfoEXT<'_>>(
                p_next,
                vk::StructureType::LAYER_SETTINGS_CREATE_INFO_EXT,
            )
        } {
            for setting in unsafe { slice_from(create_info.p_settings, create_info.setting_count) }
            {
                if setting.p_layer_name.is_null()
                    || setting.p_setting_name.is_null()
                    || unsafe { CStr::from_ptr(setting.p_layer_name) } != LAYER_NAME
                {
                    continue;
                }

                let name = unsafe { CStr::from_ptr(setting.p_setting_name) }.to_string_lossy();
                let Some(variable) = layer_setting_variable(&name) else {
                    log::warn!("ignoring unknown layer setting `{}`", name);
                    continue;
                };

                let value = match setting.ty {
                    vk::LayerSettingTypeEXT::STRING => unsafe {
                        slice_from(setting.p_values.cast::<*const c_char>(), setting.value_count)
                    }
                    .iter()
                    .filter(|value| !value.is_null())
                    .map(|&value| unsafe { CStr::from_ptr(value) }.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(","),
                    vk::LayerSettingTypeEXT::UINT32 => {
                        match unsafe {
                            slice_from(setting.p_values.cast::<u32>(), setting.value_count)
                        }
                        .first()
                        {
                            Some(value) => value.to_string(),
                            None => continue,
                        }
                    }
                    ty => {
                        log::warn!("ignoring layer setting `{}` of type {:?}", name, ty);
                        continue;
                    }
                };

                values.insert(variable, value);
            }
        }

        self.apply_overrides(|name| values.get(name).cloned())
    }
}

/// Maps a `VkLayerSettingEXT` name to the environment variable with the same effect.
fn layer_setting_variable(name: &str) -> Option<&'static str> {
    Some(match name {
        "enables" => "VVL_ENABLES",
        "disables" => "VVL_DISABLES",
        "message_id_filter" => "VVL_MESSAGE_ID_FILTER",
        "duplicate_message_limit" => "VVL_DUPLICATE_MESSAGE_LIMIT",
        _ => return None,
    })
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(err) = source {
        message.push_str(": ");
        message.push_str(&err.to_string());
        source = err.source();
    }

    message
}

/// Installs `env_logger` for the layer's own output, unless the process already has a logger.
pub(crate) fn init_logging(settings: &Settings) {
    let result = env_logger::Builder::new()
        .parse_filters(&settings.log_filter)
        .format_target(true)
        .try_init();

    if result.is_ok() {
        log::debug!("layer logging initialised with filter `{}`", settings.log_filter);
    }
}

#[cfg(test)]
mod tests {
    use super::{Enables, Settings, SettingsError};
    use crate::layer::LAYER_NAME;
    use ash::vk;
    use std::{collections::HashMap, ptr};

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect();

        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(settings.enables.core);
        assert!(!settings.enables.best_practices);
        assert_eq!(settings.duplicate_message_limit, 10);
        assert!(settings.report_flags.error);
        assert!(!settings.report_flags.info);
    }

    #[test]
    fn parse_toml() {
        let settings = Settings::from_toml(
            r#"
            message_id_filter = ["VUID-vkCmdDraw-None-08606"]
            duplicate_message_limit = 0

            [enables]
            best_practices = true
            thread_safety = false
            "#,
        )
        .unwrap();

        assert_eq!(
            settings.enables,
            Enables {
                core: true,
                object_lifetimes: true,
                thread_safety: false,
                best_practices: true,
            },
        );
        assert_eq!(settings.message_id_filter, ["VUID-vkCmdDraw-None-08606"]);
        assert_eq!(settings.duplicate_message_limit, 0);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(matches!(
            Settings::from_toml("verbose = true"),
            Err(SettingsError::Parse(_)),
        ));
    }

    #[test]
    fn environment_overrides() {
        let mut settings = Settings::default();
        settings
            .apply_overrides(vars(&[
                ("VVL_ENABLES", "best_practices"),
                ("VVL_DISABLES", "core, thread_safety"),
                ("VVL_MESSAGE_ID_FILTER", "0x1234,VUID-vkQueueSubmit-fence-00063"),
                ("VVL_DUPLICATE_MESSAGE_LIMIT", "3"),
                ("VVL_LOG", "vvl=debug"),
            ]))
            .unwrap();

        assert!(settings.enables.best_practices);
        assert!(!settings.enables.core);
        assert!(!settings.enables.thread_safety);
        assert!(settings.enables.object_lifetimes);
        assert_eq!(
            settings.message_id_filter,
            ["0x1234", "VUID-vkQueueSubmit-fence-00063"],
        );
        assert_eq!(settings.duplicate_message_limit, 3);
        assert_eq!(settings.log_filter, "vvl=debug");
    }

    #[test]
    fn invalid_overrides() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.apply_overrides(vars(&[("VVL_ENABLES", "gpu_assisted")])),
            Err(SettingsError::InvalidValue {
                name: "VVL_ENABLES",
                ..
            }),
        ));
        assert!(matches!(
            settings.apply_overrides(vars(&[("VVL_DUPLICATE_MESSAGE_LIMIT", "many")])),
            Err(SettingsError::InvalidValue { .. }),
        ));
    }

    #[test]
    fn layer_settings_from_chain() {
        let enables = [c"best_practices".as_ptr()];
        let disables = [c"thread_safety".as_ptr(), c"object_lifetimes".as_ptr()];
        let limit = 0u32;
        let layer_settings = [
            vk::LayerSettingEXT {
                p_layer_name: LAYER_NAME.as_ptr(),
                p_setting_name: c"enables".as_ptr(),
                ty: vk::LayerSettingTypeEXT::STRING,
                value_count: 1,
                p_values: enables.as_ptr().cast(),
                ..Default::default()
            },
            vk::LayerSettingEXT {
                p_layer_name: LAYER_NAME.as_ptr(),
                p_setting_name: c"disables".as_ptr(),
                ty: vk::LayerSettingTypeEXT::STRING,
                value_count: 2,
                p_values: disables.as_ptr().cast(),
                ..Default::default()
            },
            vk::LayerSettingEXT {
                p_layer_name: LAYER_NAME.as_ptr(),
                p_setting_name: c"duplicate_message_limit".as_ptr(),
                ty: vk::LayerSettingTypeEXT::UINT32,
                value_count: 1,
                p_values: ptr::from_ref(&limit).cast(),
                ..Default::default()
            },
            vk::LayerSettingEXT {
                p_layer_name: c"VK_LAYER_other".as_ptr(),
                p_setting_name: c"enables".as_ptr(),
                ty: vk::LayerSettingTypeEXT::STRING,
                value_count: 1,
                p_values: disables.as_ptr().cast(),
                ..Default::default()
            },
        ];
        let create_info = vk::LayerSettingsCreateInfoEXT {
            setting_count: layer_settings.len() as u32,
            p_settings: layer_settings.as_ptr(),
            ..Default::default()
        };

        let mut settings = Settings::default();
        unsafe { settings.apply_layer_settings(ptr::from_ref(&create_info).cast()) }.unwrap();

        assert_eq!(
            settings.enables,
            Enables {
                core: true,
                object_lifetimes: false,
                thread_safety: false,
                best_practices: true,
            },
        );
        assert_eq!(settings.duplicate_message_limit, 0);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Settings::from_file("/nonexistent/vvl_settings.toml"),
            Err(SettingsError::Io { .. }),
        ));
    }
}
