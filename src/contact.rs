use dioxus::prelude::*;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::config::RuntimeConfig;
use crate::reveal::stagger_style;
use crate::timers::after_update;

static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("name regex should compile"));

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex should compile"));

const SHAKE_MS: u32 = 500;

pub const SUBJECTS: [(&str, &str); 4] = [
    ("collaboration", "Project Collaboration"),
    ("job", "Job Opportunity"),
    ("freelance", "Freelance Work"),
    ("other", "Other"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Subject => "Subject",
            Field::Message => "Message",
        }
    }

    fn rule(self) -> FieldRule {
        match self {
            Field::Name => FieldRule {
                min_chars: Some(2),
                max_chars: Some(50),
                pattern: Some(&NAME_REGEX),
            },
            Field::Email => FieldRule {
                min_chars: None,
                max_chars: None,
                pattern: Some(&EMAIL_REGEX),
            },
            Field::Subject => FieldRule {
                min_chars: None,
                max_chars: None,
                pattern: None,
            },
            Field::Message => FieldRule {
                min_chars: Some(10),
                max_chars: Some(1000),
                pattern: None,
            },
        }
    }
}

/// Every field is required; the rest is optional per field.
struct FieldRule {
    min_chars: Option<usize>,
    max_chars: Option<usize>,
    pattern: Option<&'static Lazy<Regex>>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("{} is required.", .0.label())]
    Required(Field),
    #[error("{} must be at least {} characters.", .0.label(), .1)]
    TooShort(Field, usize),
    #[error("{} must be less than {} characters.", .0.label(), .1)]
    TooLong(Field, usize),
    #[error("Please enter a valid name (letters only).")]
    InvalidName,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a valid {}.", .0.label())]
    Invalid(Field),
}

/// Checks one value. Errors come back in precedence order: required, then
/// length, then pattern.
pub fn validate_field(field: Field, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required(field));
    }
    let rule = field.rule();
    let chars = value.chars().count();
    if let Some(min) = rule.min_chars.filter(|min| chars < *min) {
        return Err(FieldError::TooShort(field, min));
    }
    if let Some(max) = rule.max_chars.filter(|max| chars > *max) {
        return Err(FieldError::TooLong(field, max));
    }
    if let Some(pattern) = rule.pattern {
        if !pattern.is_match(value) {
            return Err(match field {
                Field::Name => FieldError::InvalidName,
                Field::Email => FieldError::InvalidEmail,
                other => FieldError::Invalid(other),
            });
        }
    }
    Ok(())
}

/// Strips everything but ASCII letters and whitespace while the name is typed.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphabetic() || ch.is_whitespace())
        .collect()
}

pub fn normalize_email(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    /// Applies typed input, sanitizing the fields that are cleaned as you type.
    pub fn set(&mut self, field: Field, raw: String) {
        match field {
            Field::Name => self.name = sanitize_name(&raw),
            Field::Email => self.email = normalize_email(&raw),
            Field::Subject => self.subject = raw,
            Field::Message => self.message = raw,
        }
    }
}

/// Form values plus the per-field error shown under each input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub form: ContactForm,
    errors: Vec<(Field, FieldError)>,
    focused: Option<Field>,
    pub submitting: bool,
}

impl FormState {
    pub fn error(&self, field: Field) -> Option<&FieldError> {
        self.errors
            .iter()
            .find(|(owner, _)| *owner == field)
            .map(|(_, error)| error)
    }

    /// Typing clears the field's error; it comes back on blur.
    pub fn input(&mut self, field: Field, raw: String) {
        self.form.set(field, raw);
        self.errors.retain(|(owner, _)| *owner != field);
    }

    pub fn focus(&mut self, field: Field) {
        self.focused = Some(field);
    }

    pub fn blur(&mut self, field: Field) -> bool {
        if self.focused == Some(field) {
            self.focused = None;
        }
        self.errors.retain(|(owner, _)| *owner != field);
        match validate_field(field, self.form.value(field)) {
            Ok(()) => true,
            Err(error) => {
                self.errors.push((field, error));
                false
            }
        }
    }

    /// Validates every field and keeps the errors. `true` when the form can go.
    pub fn validate_all(&mut self) -> bool {
        self.errors = Field::ALL
            .iter()
            .filter_map(|field| {
                validate_field(*field, self.form.value(*field))
                    .err()
                    .map(|error| (*field, error))
            })
            .collect();
        self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Classes for the group wrapping `field`: focus, filled and error marks.
    pub fn group_class(&self, field: Field) -> String {
        let mut class = String::from("form-group");
        if self.focused == Some(field) {
            class.push_str(" focused");
        }
        if !self.form.value(field).is_empty() {
            class.push_str(" has-value");
        }
        if self.error(field).is_some() {
            class.push_str(" has-error");
        }
        class
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
        }
    }

    fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "notification notification-success",
            ToastKind::Error => "notification notification-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Toasts {
    next_id: u64,
    items: Vec<Toast>,
}

impl Toasts {
    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.items.push(Toast {
            id: self.next_id,
            kind,
            text: text.into(),
        });
        self.next_id
    }

    /// Closing twice is harmless; the auto-dismiss timer may race a click.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|toast| toast.id != id);
        self.items.len() != before
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

async fn simulate_submission(form: &ContactForm, delay_ms: u32) -> Result<(), String> {
    let body = serde_json::to_string(form).map_err(|err| format!("encode failed: {err}"))?;
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(delay_ms).await;
    #[cfg(not(target_arch = "wasm32"))]
    let _ = delay_ms;
    tracing::info!("contact: form submitted ({} bytes)", body.len());
    Ok(())
}

fn show_toast(mut toasts: Signal<Toasts>, kind: ToastKind, text: &str, timeout_ms: u32) {
    let id = toasts.write().push(kind, text);
    after_update(timeout_ms, toasts, move |toasts| {
        toasts.dismiss(id);
    });
}

#[component]
pub fn ContactSection() -> Element {
    let config = use_context::<RuntimeConfig>();
    let mut state = use_signal(FormState::default);
    let mut shaking = use_signal(|| false);
    let toasts = use_signal(Toasts::default);

    let submit_delay_ms = config.submit_delay_ms;
    let notification_timeout_ms = config.notification_timeout_ms;
    let submitting = state.read().submitting;
    let form_class = if shaking() { "contact-form shake" } else { "contact-form" };
    let button_class = if submitting { "btn submit-btn loading" } else { "btn submit-btn" };

    rsx! {
        form {
            id: "contact-form",
            class: "{form_class}",
            novalidate: true,
            onsubmit: move |event| {
                event.prevent_default();
                if state.peek().submitting {
                    return;
                }
                if !state.write().validate_all() {
                    tracing::debug!("contact: submit blocked by validation");
                    shaking.set(true);
                    after_update(SHAKE_MS, shaking, |shaking| *shaking = false);
                    return;
                }
                let form = state.peek().form.clone();
                state.write().submitting = true;
                spawn(async move {
                    match simulate_submission(&form, submit_delay_ms).await {
                        Ok(()) => {
                            show_toast(
                                toasts,
                                ToastKind::Success,
                                "Message sent successfully! I'll get back to you soon.",
                                notification_timeout_ms,
                            );
                            state.write().reset();
                        }
                        Err(message) => {
                            tracing::warn!("contact: {message}");
                            show_toast(
                                toasts,
                                ToastKind::Error,
                                "Failed to send message. Please try again.",
                                notification_timeout_ms,
                            );
                            state.write().submitting = false;
                        }
                    }
                });
            },
            FormGroup { field: Field::Name, state,
                input {
                    id: "name",
                    name: "name",
                    r#type: "text",
                    value: "{state.read().form.name}",
                    disabled: submitting,
                    oninput: move |event| state.write().input(Field::Name, event.value()),
                    onfocus: move |_| state.write().focus(Field::Name),
                    onblur: move |_| {
                        state.write().blur(Field::Name);
                    },
                }
            }
            FormGroup { field: Field::Email, state,
                input {
                    id: "email",
                    name: "email",
                    r#type: "email",
                    value: "{state.read().form.email}",
                    disabled: submitting,
                    oninput: move |event| state.write().input(Field::Email, event.value()),
                    onfocus: move |_| state.write().focus(Field::Email),
                    onblur: move |_| {
                        state.write().blur(Field::Email);
                    },
                }
            }
            FormGroup { field: Field::Subject, state,
                select {
                    id: "subject",
                    name: "subject",
                    value: "{state.read().form.subject}",
                    disabled: submitting,
                    onchange: move |event| state.write().input(Field::Subject, event.value()),
                    onfocus: move |_| state.write().focus(Field::Subject),
                    onblur: move |_| {
                        state.write().blur(Field::Subject);
                    },
                    option { value: "", "Select a subject" }
                    for (value, label) in SUBJECTS {
                        option { key: "{value}", value: "{value}", "{label}" }
                    }
                }
            }
            FormGroup { field: Field::Message, state,
                textarea {
                    id: "message",
                    name: "message",
                    rows: "6",
                    value: "{state.read().form.message}",
                    disabled: submitting,
                    oninput: move |event| state.write().input(Field::Message, event.value()),
                    onfocus: move |_| state.write().focus(Field::Message),
                    onblur: move |_| {
                        state.write().blur(Field::Message);
                    },
                }
            }
            button {
                r#type: "submit",
                class: "{button_class}",
                disabled: submitting,
                span { class: "btn-text", if submitting { "Sending..." } else { "Send Message" } }
                span { class: "btn-loader" }
            }
        }
        ToastStack { toasts }
    }
}

#[component]
fn FormGroup(field: Field, state: Signal<FormState>, children: Element) -> Element {
    let (class, error) = {
        let state = state.read();
        (state.group_class(field), state.error(field).map(ToString::to_string))
    };
    let id = field.label().to_lowercase();
    let index = Field::ALL.iter().position(|candidate| *candidate == field).unwrap_or(0);
    let entrance = stagger_style(index);
    rsx! {
        div { class: "{class}", style: "{entrance}",
            label { r#for: "{id}", "{field.label()}" }
            {children}
            if let Some(message) = error {
                span { class: "error-message", role: "alert", "{message}" }
            }
        }
    }
}

#[component]
fn ToastStack(toasts: Signal<Toasts>) -> Element {
    let mut toasts = toasts;
    let items = toasts.read().items().to_vec();
    rsx! {
        div { class: "notification-stack", aria_live: "polite",
            for toast in items {
                div { key: "{toast.id}", class: toast.kind.class(),
                    div { class: "notification-content",
                        span { class: "notification-icon", "{toast.kind.icon()}" }
                        span { class: "notification-text", "{toast.text}" }
                        button {
                            r#type: "button",
                            class: "notification-close",
                            aria_label: "Dismiss",
                            onclick: move |_| {
                                toasts.write().dismiss(toast.id);
                            },
                            "×"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn message(field: Field, value: &str) -> Option<String> {
        validate_field(field, value).err().map(|error| error.to_string())
    }

    #[test]
    fn name_rules_and_messages() {
        assert_eq!(message(Field::Name, "Jordan Lee"), None);
        assert_eq!(message(Field::Name, "   ").as_deref(), Some("Name is required."));
        assert_eq!(
            message(Field::Name, "J").as_deref(),
            Some("Name must be at least 2 characters.")
        );
        assert_eq!(
            message(Field::Name, &"a".repeat(51)).as_deref(),
            Some("Name must be less than 50 characters.")
        );
        assert_eq!(
            message(Field::Name, "J3").as_deref(),
            Some("Please enter a valid name (letters only).")
        );
    }

    #[test]
    fn email_and_message_rules() {
        assert_eq!(message(Field::Email, "jordan@example.com"), None);
        assert_eq!(
            message(Field::Email, "jordan@example").as_deref(),
            Some("Please enter a valid email address.")
        );
        assert_eq!(message(Field::Subject, "").as_deref(), Some("Subject is required."));
        assert_eq!(
            message(Field::Message, "too short").as_deref(),
            Some("Message must be at least 10 characters.")
        );
        assert_eq!(
            message(Field::Message, &"x".repeat(1001)).as_deref(),
            Some("Message must be less than 1000 characters.")
        );
        assert_eq!(message(Field::Message, &"x".repeat(1000)), None);
    }

    #[test]
    fn typing_sanitizes_and_clears_errors() {
        let mut state = FormState::default();
        assert!(!state.blur(Field::Email));
        assert!(state.error(Field::Email).is_some());
        state.input(Field::Email, "  Jordan@Example.COM ".to_string());
        assert_eq!(state.error(Field::Email), None);
        assert_eq!(state.form.email, "jordan@example.com");

        state.input(Field::Name, "J0rdan L33!".to_string());
        assert_eq!(state.form.name, "Jrdan L");
    }

    #[test]
    fn submit_validation_collects_every_error_and_reset_clears() {
        let mut state = FormState::default();
        state.input(Field::Name, "Jordan Lee".to_string());
        assert!(!state.validate_all());
        assert_eq!(state.error(Field::Name), None);
        assert_eq!(state.error(Field::Subject), Some(&FieldError::Required(Field::Subject)));

        state.input(Field::Email, "jordan@example.com".to_string());
        state.input(Field::Subject, "job".to_string());
        state.input(Field::Message, "Hello there, let's talk.".to_string());
        assert!(state.validate_all());
        state.submitting = true;
        state.reset();
        assert_eq!(state, FormState::default());
    }

    #[test]
    fn group_class_tracks_focus_value_and_error() {
        let mut state = FormState::default();
        assert_eq!(state.group_class(Field::Name), "form-group");

        state.focus(Field::Name);
        state.input(Field::Name, "J".to_string());
        assert_eq!(state.group_class(Field::Name), "form-group focused has-value");
        assert_eq!(state.group_class(Field::Email), "form-group");

        assert!(!state.blur(Field::Name));
        assert_eq!(state.group_class(Field::Name), "form-group has-value has-error");

        state.input(Field::Name, String::new());
        assert_eq!(state.group_class(Field::Name), "form-group");
    }

    #[test]
    fn blurring_another_field_keeps_focus() {
        let mut state = FormState::default();
        state.focus(Field::Message);
        state.blur(Field::Email);
        assert!(state.group_class(Field::Message).contains("focused"));
    }

    thread_local! {
        static MOUNTED_TOASTS: std::cell::Cell<Option<Signal<Toasts>>> =
            const { std::cell::Cell::new(None) };
    }

    fn toast_app() -> Element {
        let toasts = use_signal(Toasts::default);
        use_hook(move || {
            MOUNTED_TOASTS.with(|slot| slot.set(Some(toasts)));
            show_toast(toasts, ToastKind::Success, "sent", 5000);
        });
        rsx! { ToastStack { toasts } }
    }

    #[test]
    fn toast_stays_visible_until_its_timeout() {
        let mut dom = VirtualDom::new(toast_app);
        dom.rebuild_in_place();
        let toasts = MOUNTED_TOASTS.with(|slot| slot.get()).expect("app stored its toasts");

        dom.in_runtime(|| {
            assert_eq!(toasts.peek().items().len(), 1);
            assert_eq!(crate::timers::advance(4999), 0);
            assert_eq!(toasts.peek().items().len(), 1);
            assert_eq!(crate::timers::advance(1), 1);
            assert!(toasts.peek().items().is_empty());
        });
    }

    #[test]
    fn form_group_renders_its_error() {
        fn app() -> Element {
            let mut state = use_signal(FormState::default);
            use_hook(move || {
                state.write().blur(Field::Name);
            });
            rsx! {
                FormGroup { field: Field::Name, state,
                    input { id: "name" }
                }
            }
        }
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
    }

    #[test]
    fn toasts_dismiss_once() {
        let mut toasts = Toasts::default();
        let first = toasts.push(ToastKind::Success, "sent");
        let second = toasts.push(ToastKind::Error, "failed");
        assert!(toasts.dismiss(first));
        assert!(!toasts.dismiss(first));
        let ids: Vec<_> = toasts.items().iter().map(|toast| toast.id).collect();
        assert_eq!(ids, vec![second]);
        assert_eq!(ToastKind::Error.icon(), "❌");
    }
}
