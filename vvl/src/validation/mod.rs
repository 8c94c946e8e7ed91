//! The validators that check API usage against the shadow state.
//!
//! Each validator is an independent implementation of [`InstanceValidator`] or
//! [`DeviceValidator`] that overrides only the hooks it needs. They read the state kept by the
//! state trackers and never write it; the little state of their own (such as the objects
//! [`ThreadSafety`] sees in use) is private to them.

pub use self::{
    best_practices::BestPractices,
    core_checks::{CoreChecks, InstanceCoreChecks},
    object_lifetimes::{InstanceObjectLifetimes, ObjectLifetimes},
    thread_safety::ThreadSafety,
};
use crate::{
    commands::{DeviceDispatchTable, DeviceValidator, InstanceValidator},
    report::DebugReport,
    settings::Settings,
    state::{DeviceState, DeviceStateTracker, InstanceState, InstanceStateTracker},
};
use std::sync::Arc;

pub mod best_practices;
pub mod core_checks;
pub mod object_lifetimes;
pub mod thread_safety;

/// Builds the validator list of a new instance. The state tracker always comes first.
pub(crate) fn instance_validators(
    settings: &Settings,
    state: &Arc<InstanceState>,
    report: &Arc<DebugReport>,
) -> Vec<Box<dyn InstanceValidator>> {
    let enables = &settings.enables;
    let mut validators: Vec<Box<dyn InstanceValidator>> = vec![Box::new(
        InstanceStateTracker::new(state.clone(), report.clone()),
    )];

    if enables.core {
        validators.push(Box::new(InstanceCoreChecks::new(
            state.clone(),
            report.clone(),
        )));
    }

    if enables.object_lifetimes {
        validators.push(Box::new(InstanceObjectLifetimes::new(
            state.clone(),
            report.clone(),
        )));
    }

    validators
}

/// Builds the validator list of a new device. The state tracker always comes first, followed
/// by the enabled validators in a fixed order.
pub(crate) fn device_validators(
    settings: &Settings,
    state: &Arc<DeviceState>,
    report: &Arc<DebugReport>,
    table: DeviceDispatchTable,
) -> Vec<Box<dyn DeviceValidator>> {
    let enables = &settings.enables;
    let mut validators: Vec<Box<dyn DeviceValidator>> =
        vec![Box::new(DeviceStateTracker::new(state.clone(), table))];

    if enables.core {
        validators.push(Box::new(CoreChecks::new(state.clone(), report.clone())));
    }

    if enables.object_lifetimes {
        validators.push(Box::new(ObjectLifetimes::new(state.clone(), report.clone())));
    }

    if enables.thread_safety {
        validators.push(Box::new(ThreadSafety::new(state.clone(), report.clone())));
    }

    if enables.best_practices {
        validators.push(Box::new(BestPractices::new(state.clone(), report.clone())));
    }

    validators
}
