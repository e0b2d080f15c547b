use forge_registry::InputMethodError;

pub(crate) fn input_error(
    identity: &str,
    input_type: &str,
    message: impl Into<String>,
) -> InputMethodError {
    InputMethodError {
        identity: identity.to_string(),
        input_type: input_type.to_string(),
        message: message.into(),
    }
}
