use crate::config::AudioSessionPolicy;

/// Applies the configured audio session policy once, when the session is built
pub trait AudioSessionConfigurator {
    fn set_category(&mut self, policy: &AudioSessionPolicy);

    fn activate(&mut self);
}

pub(crate) fn apply(configurator: &mut dyn AudioSessionConfigurator, policy: &AudioSessionPolicy) {
    tracing::debug!(
        target: "aria::service",
        category = ?policy.category,
        mode = ?policy.mode,
        "configuring audio session"
    );
    configurator.set_category(policy);
    configurator.activate();
}
