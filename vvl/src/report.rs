//! Delivery of validation messages to the application.
//!
//! Messages go to every `VK_EXT_debug_utils` messenger whose severity and type masks match. When
//! the application registered no messenger, they are written to the `log` facade instead.

use crate::{
    handle::ObjectRef,
    location::Location,
    settings::{ReportFlags, Settings},
    ValidationError,
};
use ash::vk;
use foldhash::{HashMap, HashSet};
use parking_lot::{Mutex, RwLock};
use std::{
    ffi::{c_void, CString},
    fmt, ptr,
};
use xxhash_rust::xxh32::xxh32;

/// Severity of a reported message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Performance,
    Info,
}

impl Severity {
    fn prefix(self) -> &'static str {
        match self {
            Severity::Error => "Validation Error",
            Severity::Warning => "Validation Warning",
            Severity::Performance => "Validation Performance Warning",
            Severity::Info => "Validation Information",
        }
    }

    fn message_severity(self) -> vk::DebugUtilsMessageSeverityFlagsEXT {
        match self {
            Severity::Error => vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            Severity::Warning | Severity::Performance => {
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
            }
            Severity::Info => vk::DebugUtilsMessageSeverityFlagsEXT::INFO,
        }
    }

    fn message_type(self) -> vk::DebugUtilsMessageTypeFlagsEXT {
        match self {
            Severity::Performance => vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            _ => vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
        }
    }

    fn enabled(self, flags: &ReportFlags) -> bool {
        match self {
            Severity::Error => flags.error,
            Severity::Warning => flags.warning,
            Severity::Performance => flags.performance,
            Severity::Info => flags.info,
        }
    }
}

/// Computes the message id reported alongside a VUID.
///
/// The id is the XXH32 hash of the VUID with seed 8, so it stays the same across builds and
/// matches the ids other Vulkan validation layers print.
#[inline]
pub fn message_id(vuid: &str) -> u32 {
    xxh32(vuid.as_bytes(), 8)
}

#[derive(Clone, Copy)]
struct Messenger {
    /// Null for messengers passed in the `pNext` chain of `VkInstanceCreateInfo`.
    handle: vk::DebugUtilsMessengerEXT,
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    types: vk::DebugUtilsMessageTypeFlagsEXT,
    callback: vk::PFN_vkDebugUtilsMessengerCallbackEXT,
    user_data: usize,
}

/// The report sink shared by an instance, its devices and all of their validators.
pub struct DebugReport {
    messengers: RwLock<Vec<Messenger>>,
    /// Messengers from the instance create info chain while they are inactive.
    parked: Mutex<Vec<Messenger>>,
    flags: ReportFlags,
    filter: HashSet<u32>,
    duplicate_limit: u32,
    counts: Mutex<HashMap<u32, u32>>,
}

impl DebugReport {
    pub fn new(settings: &Settings) -> Self {
        let filter = settings
            .message_id_filter
            .iter()
            .filter_map(|entry| parse_filter_entry(entry))
            .collect();

        DebugReport {
            messengers: RwLock::new(Vec::new()),
            parked: Mutex::new(Vec::new()),
            flags: settings.report_flags,
            filter,
            duplicate_limit: settings.duplicate_message_limit,
            counts: Mutex::new(HashMap::default()),
        }
    }

    /// Registers a messenger created with `vkCreateDebugUtilsMessengerEXT`.
    pub fn register(
        &self,
        handle: vk::DebugUtilsMessengerEXT,
        create_info: &vk::DebugUtilsMessengerCreateInfoEXT<'_>,
    ) {
        self.messengers.write().push(Messenger {
            handle,
            severity: create_info.message_severity,
            types: create_info.message_type,
            callback: create_info.pfn_user_callback,
            user_data: create_info.p_user_data as usize,
        });
    }

    pub fn unregister(&self, handle: vk::DebugUtilsMessengerEXT) {
        self.messengers.write().retain(|m| m.handle != handle);
    }

    /// Registers every `VkDebugUtilsMessengerCreateInfoEXT` found in a `pNext` chain.
    ///
    /// # Safety
    ///
    /// - `p_next` must be null or a valid structure chain.
    pub unsafe fn register_chained(&self, p_next: *const c_void) {
        for create_info in unsafe {
            crate::ffi::chain_iter::<vk::DebugUtilsMessengerCreateInfoEXT<'_>>(
                p_next,
                vk::StructureType::DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT,
            )
        } {
            log::debug!("registering messenger from the instance create info chain");
            self.register(vk::DebugUtilsMessengerEXT::null(), create_info);
        }
    }

    /// Deactivates the messengers registered with [`register_chained`], which only apply while
    /// the instance is created and destroyed.
    ///
    /// [`register_chained`]: Self::register_chained
    pub fn park_chained(&self) {
        let mut messengers = self.messengers.write();
        let mut parked = self.parked.lock();
        parked.extend(
            messengers
                .iter()
                .filter(|m| m.handle == vk::DebugUtilsMessengerEXT::null())
                .copied(),
        );
        messengers.retain(|m| m.handle != vk::DebugUtilsMessengerEXT::null());
    }

    /// Reactivates the messengers deactivated by [`park_chained`].
    ///
    /// [`park_chained`]: Self::park_chained
    pub fn restore_chained(&self) {
        let mut parked = self.parked.lock();
        self.messengers.write().extend(parked.drain(..));
    }

    /// Number of active messengers, including chained ones.
    pub fn messenger_count(&self) -> usize {
        self.messengers.read().len()
    }

    /// Reports a validation error. Returns `true` if a messenger asked to skip the call.
    pub fn error(
        &self,
        vuid: &str,
        objects: &[ObjectRef],
        location: &Location,
        message: impl fmt::Display,
    ) -> bool {
        self.log_msg(Severity::Error, vuid, objects, &location.to_string(), message)
    }

    pub fn warning(
        &self,
        vuid: &str,
        objects: &[ObjectRef],
        location: &Location,
        message: impl fmt::Display,
    ) -> bool {
        self.log_msg(Severity::Warning, vuid, objects, &location.to_string(), message)
    }

    pub fn performance(
        &self,
        vuid: &str,
        objects: &[ObjectRef],
        location: &Location,
        message: impl fmt::Display,
    ) -> bool {
        self.log_msg(Severity::Performance, vuid, objects, &location.to_string(), message)
    }

    /// Reports a [`ValidationError`] built by a validator. The error's context extends
    /// `location`.
    pub fn validation_error(
        &self,
        objects: &[ObjectRef],
        location: &Location,
        error: &ValidationError,
    ) -> bool {
        let vuid = error
            .vuids
            .first()
            .copied()
            .unwrap_or("UNASSIGNED-GeneralParameterError");

        self.log_msg(
            Severity::Error,
            vuid,
            objects,
            &location.with_context(&error.context),
            &error.problem,
        )
    }

    fn log_msg(
        &self,
        severity: Severity,
        vuid: &str,
        objects: &[ObjectRef],
        location: &str,
        message: impl fmt::Display,
    ) -> bool {
        if !severity.enabled(&self.flags) {
            return false;
        }

        let id = message_id(vuid);

        if self.filter.contains(&id) {
            return false;
        }

        if self.duplicate_limit != 0 {
            let mut counts = self.counts.lock();
            let count = counts.entry(id).or_insert(0);

            if *count >= self.duplicate_limit {
                return false;
            }

            *count += 1;
        }

        let text = format_message(severity, vuid, id, objects, location, &message);
        let messengers: Vec<Messenger> = self.messengers.read().clone();

        if messengers.is_empty() {
            match severity {
                Severity::Error => log::error!("{}", text),
                Severity::Warning | Severity::Performance => log::warn!("{}", text),
                Severity::Info => log::info!("{}", text),
            }

            return false;
        }

        let message_severity = severity.message_severity();
        let message_type = severity.message_type();
        let vuid_c = to_cstring(vuid);
        let text_c = to_cstring(&text);
        let object_infos: Vec<vk::DebugUtilsObjectNameInfoEXT<'_>> = objects
            .iter()
            .map(|object| {
                let mut info = vk::DebugUtilsObjectNameInfoEXT::default();
                info.object_type = object.object_type;
                info.object_handle = object.raw;
                info
            })
            .collect();

        let mut callback_data = vk::DebugUtilsMessengerCallbackDataEXT::default();
        callback_data.p_message_id_name = vuid_c.as_ptr();
        callback_data.message_id_number = id as i32;
        callback_data.p_message = text_c.as_ptr();
        callback_data.object_count = object_infos.len() as u32;
        callback_data.p_objects = if object_infos.is_empty() {
            ptr::null()
        } else {
            object_infos.as_ptr()
        };

        let mut skip = false;

        for messenger in &messengers {
            if !messenger.severity.contains(message_severity)
                || !messenger.types.intersects(message_type)
            {
                continue;
            }

            if let Some(callback) = messenger.callback {
                let ret = unsafe {
                    callback(
                        message_severity,
                        message_type,
                        &callback_data,
                        messenger.user_data as *mut c_void,
                    )
                };
                skip |= ret == vk::TRUE;
            }
        }

        skip
    }
}

fn parse_filter_entry(entry: &str) -> Option<u32> {
    let entry = entry.trim();

    if let Some(hex) = entry
        .strip_prefix("0x")
        .or_else(|| entry.strip_prefix("0X"))
    {
        match u32::from_str_radix(hex, 16) {
            Ok(id) => Some(id),
            Err(_) => {
                log::warn!("ignoring malformed message id `{}` in the filter", entry);
                None
            }
        }
    } else if entry.is_empty() {
        None
    } else {
        Some(message_id(entry))
    }
}

fn format_message(
    severity: Severity,
    vuid: &str,
    id: u32,
    objects: &[ObjectRef],
    location: &str,
    message: &dyn fmt::Display,
) -> String {
    use std::fmt::Write;

    let mut text = format!("{}: [ {} ] ", severity.prefix(), vuid);

    for (i, object) in objects.iter().enumerate() {
        let _ = write!(text, "Object {}: {}; ", i, object);
    }

    let separator = if location.ends_with(' ') { "" } else { " " };
    let _ = write!(
        text,
        "| MessageID = 0x{:x} | {}{}{}",
        id, location, separator, message,
    );

    text
}

fn to_cstring(text: &str) -> CString {
    CString::new(text.replace('\0', " ")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{message_id, DebugReport};
    use crate::{commands::Command, handle::ObjectRef, location::Location, settings::Settings};
    use ash::vk::{self, Handle};
    use parking_lot::Mutex;
    use std::ffi::{c_void, CStr};

    #[derive(Default)]
    struct Captured {
        messages: Mutex<Vec<(String, String, u32)>>,
        skip: bool,
    }

    unsafe extern "system" fn capture(
        _severity: vk::DebugUtilsMessageSeverityFlagsEXT,
        _types: vk::DebugUtilsMessageTypeFlagsEXT,
        data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
        user_data: *mut c_void,
    ) -> vk::Bool32 {
        let captured = unsafe { &*(user_data as *const Captured) };
        let data = unsafe { &*data };
        let vuid = unsafe { CStr::from_ptr(data.p_message_id_name) };
        let text = unsafe { CStr::from_ptr(data.p_message) };
        captured.messages.lock().push((
            vuid.to_string_lossy().into_owned(),
            text.to_string_lossy().into_owned(),
            data.object_count,
        ));

        if captured.skip {
            vk::TRUE
        } else {
            vk::FALSE
        }
    }

    fn messenger_info(captured: &Captured) -> vk::DebugUtilsMessengerCreateInfoEXT<'_> {
        vk::DebugUtilsMessengerCreateInfoEXT {
            message_severity: vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
            message_type: vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            pfn_user_callback: Some(capture),
            p_user_data: std::ptr::from_ref(captured).cast_mut().cast(),
            ..Default::default()
        }
    }

    #[test]
    fn message_format() {
        let captured = Captured::default();
        let report = DebugReport::new(&Settings::default());
        report.register(
            vk::DebugUtilsMessengerEXT::from_raw(1),
            &messenger_info(&captured),
        );

        let buffer = vk::Buffer::from_raw(0x42);
        let loc = Location::new(Command::DestroyBuffer).dot("buffer");
        let skip = report.error(
            "VUID-vkDestroyBuffer-buffer-00922",
            &[ObjectRef::from(buffer)],
            &loc,
            "is in use by a pending command buffer.",
        );
        assert!(!skip);

        let messages = captured.messages.lock();
        assert_eq!(messages.len(), 1);
        let (vuid, text, object_count) = &messages[0];
        assert_eq!(vuid, "VUID-vkDestroyBuffer-buffer-00922");
        assert_eq!(*object_count, 1);
        assert_eq!(
            *text,
            format!(
                "Validation Error: [ VUID-vkDestroyBuffer-buffer-00922 ] Object 0: handle = 0x42, \
                type = VK_OBJECT_TYPE_BUFFER; | MessageID = 0x{:x} | vkDestroyBuffer(): buffer is \
                in use by a pending command buffer.",
                message_id("VUID-vkDestroyBuffer-buffer-00922"),
            ),
        );
    }

    #[test]
    fn message_ids_are_stable() {
        assert_eq!(message_id("VUID-vkCmdDraw-None-08606"), 0x3430a94e);
        assert_eq!(message_id("VUID-vkDestroyBuffer-buffer-00922"), 0xe4549c11);
        assert_eq!(
            message_id("UNASSIGNED-Threading-MultipleThreads-Write"),
            0xa05b236e,
        );
    }

    #[test]
    fn callback_can_skip() {
        let captured = Captured {
            skip: true,
            ..Default::default()
        };
        let report = DebugReport::new(&Settings::default());
        report.register(
            vk::DebugUtilsMessengerEXT::from_raw(1),
            &messenger_info(&captured),
        );

        let loc = Location::new(Command::CmdDraw);
        assert!(report.error("VUID-vkCmdDraw-None-08606", &[], &loc, "no pipeline bound"));
        assert!(report.performance("BestPractices-vkCmdDraw-instance-count-zero", &[], &loc, ""));
    }

    #[test]
    fn filter_and_duplicate_limit() {
        let captured = Captured::default();
        let mut settings = Settings::default();
        settings.duplicate_message_limit = 2;
        settings.message_id_filter = vec![
            "VUID-vkCmdDraw-None-08606".to_owned(),
            format!("0x{:x}", message_id("VUID-vkCmdDispatch-None-08606")),
        ];
        let report = DebugReport::new(&settings);
        report.register(
            vk::DebugUtilsMessengerEXT::from_raw(1),
            &messenger_info(&captured),
        );

        let loc = Location::new(Command::CmdDraw);
        report.error("VUID-vkCmdDraw-None-08606", &[], &loc, "muted");
        report.error("VUID-vkCmdDispatch-None-08606", &[], &loc, "muted");

        for _ in 0..5 {
            report.error("VUID-vkCmdDraw-renderpass", &[], &loc, "limited");
        }

        assert_eq!(captured.messages.lock().len(), 2);
    }

    #[test]
    fn severity_masks() {
        let captured = Captured::default();
        let report = DebugReport::new(&Settings::default());
        let mut info = messenger_info(&captured);
        info.message_severity = vk::DebugUtilsMessageSeverityFlagsEXT::ERROR;
        report.register(vk::DebugUtilsMessengerEXT::from_raw(7), &info);

        let loc = Location::new(Command::AllocateMemory);
        report.warning("UNASSIGNED-warning", &[], &loc, "dropped");
        report.error("UNASSIGNED-error", &[], &loc, "delivered");
        assert_eq!(captured.messages.lock().len(), 1);

        report.unregister(vk::DebugUtilsMessengerEXT::from_raw(7));
        assert_eq!(report.messenger_count(), 0);
        report.error("UNASSIGNED-error", &[], &loc, "logged");
        assert_eq!(captured.messages.lock().len(), 1);
    }

    #[test]
    fn chained_messengers_are_parked() {
        let captured = Captured::default();
        let report = DebugReport::new(&Settings::default());
        let mut chained = messenger_info(&captured);
        let create_info = vk::InstanceCreateInfo::default().push_next(&mut chained);

        unsafe { report.register_chained(create_info.p_next) };
        assert_eq!(report.messenger_count(), 1);

        report.park_chained();
        assert_eq!(report.messenger_count(), 0);
        let loc = Location::new(Command::DestroyInstance);
        report.error("UNASSIGNED-parked", &[], &loc, "logged");
        assert!(captured.messages.lock().is_empty());

        report.restore_chained();
        report.error("UNASSIGNED-restored", &[], &loc, "delivered");
        assert_eq!(captured.messages.lock().len(), 1);
    }
}
