use dioxus::prelude::*;
use crate::constants::*;
use crate::utils::parse_f64_input;

const FIELD_STYLE: &str = "
    width: 100%; min-width: 0; box-sizing: border-box;
    padding: 6px 8px; font-size: 12px;
    outline: none;
    user-select: text;
";

/// Set while one of the text or number fields has keyboard focus, so global
/// hotkeys can stand down.
#[derive(Clone, Copy)]
pub struct FieldFocus(pub Signal<bool>);

fn set_field_focus(focus: Option<FieldFocus>, focused: bool) {
    if let Some(FieldFocus(mut signal)) = focus {
        signal.set(focused);
    }
}

/// Number input that commits on blur or Enter. Unparsable text reverts to
/// the current value.
#[component]
pub fn NumericField(
    label: &'static str,
    value: f64,
    step: &'static str,
    clamp_min: Option<f64>,
    on_commit: EventHandler<f64>,
) -> Element {
    let focus = try_use_context::<FieldFocus>();
    let mut text = use_signal(|| format_number(value));
    let mut last_prop_value = use_signal(|| value);

    use_effect(use_reactive((&value,), move |(v,)| {
        if (v - *last_prop_value.peek()).abs() > 0.0001 {
            text.set(format_number(v));
            last_prop_value.set(v);
        }
    }));

    let make_commit = || {
        let mut text = text.clone();
        let mut last_prop_value = last_prop_value.clone();
        let on_commit = on_commit.clone();
        move || {
            let mut parsed = parse_f64_input(&text(), value);
            if let Some(min) = clamp_min {
                parsed = parsed.max(min);
            }
            on_commit.call(parsed);
            text.set(format_number(parsed));
            last_prop_value.set(parsed);
        }
    };

    let mut commit_on_blur = make_commit();
    let mut commit_on_key = make_commit();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 4px; min-width: 0;",
            span { style: "font-size: 10px; color: {TEXT_MUTED};", "{label}" }
            input {
                r#type: "number",
                step: "{step}",
                value: "{text()}",
                style: "{FIELD_STYLE} background-color: {BG_SURFACE}; color: {TEXT_PRIMARY}; border: 1px solid {BORDER_DEFAULT}; border-radius: 4px;",
                oninput: move |e| text.set(e.value()),
                onfocus: move |_| set_field_focus(focus, true),
                onblur: move |_| {
                    set_field_focus(focus, false);
                    commit_on_blur();
                },
                onkeydown: move |e: KeyboardEvent| {
                    if e.key() == Key::Enter {
                        commit_on_key();
                    }
                },
            }
        }
    }
}

/// Free-text input that hands the raw text to `on_commit` on blur or Enter.
#[component]
pub fn TextField(
    label: &'static str,
    value: String,
    width: Option<&'static str>,
    on_commit: EventHandler<String>,
) -> Element {
    let focus = try_use_context::<FieldFocus>();
    let mut text = use_signal(|| value.clone());
    let mut last_prop_value = use_signal(|| value.clone());

    use_effect(use_reactive((&value,), move |(v,)| {
        if v != *last_prop_value.peek() {
            text.set(v.clone());
            last_prop_value.set(v);
        }
    }));

    let commit = move || {
        let next = text();
        on_commit.call(next.clone());
        last_prop_value.set(next);
    };
    let mut commit_on_blur = commit.clone();
    let mut commit_on_key = commit;
    let width = width.unwrap_or("100%");

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 4px; min-width: 0; width: {width};",
            if !label.is_empty() {
                span { style: "font-size: 10px; color: {TEXT_MUTED};", "{label}" }
            }
            input {
                r#type: "text",
                value: "{text()}",
                style: "{FIELD_STYLE} background-color: {BG_SURFACE}; color: {TEXT_PRIMARY}; border: 1px solid {BORDER_DEFAULT}; border-radius: 4px;",
                oninput: move |e| text.set(e.value()),
                onfocus: move |_| set_field_focus(focus, true),
                onblur: move |_| {
                    set_field_focus(focus, false);
                    commit_on_blur();
                },
                onkeydown: move |e: KeyboardEvent| {
                    if e.key() == Key::Enter {
                        commit_on_key();
                    }
                },
            }
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
