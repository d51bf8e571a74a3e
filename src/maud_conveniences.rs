use maud::{Escaper, Markup, PreEscaped, Render, html};
use std::fmt::Write;

pub const INPUT_CLASS: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";
pub const SUBMIT_BUTTON_CLASS: &str = "bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline";
pub const SECONDARY_BUTTON_CLASS: &str = "bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded";
pub const DANGER_BUTTON_CLASS: &str = "bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded";

pub fn render_table<const N: usize>(
    overall_title: &'static str,
    titles: [&'static str; N],
    items: Vec<[Markup; N]>,
) -> Markup {
    html! {
        div class="container mx-auto" {
            (title(overall_title))
            div class="overflow-x-auto" {
                table class="min-w-full bg-gray-800 rounded shadow-md" {
                    thead class="bg-gray-700" {
                        tr {
                            @for title in titles {
                                th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                            }
                        }
                    }
                    tbody {
                        @for row in items {
                            tr {
                                @for col in row {
                                    td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn escape(s: impl AsRef<str>) -> PreEscaped<String> {
    let mut output = String::new();
    let _ = Escaper::new(&mut output).write_str(s.as_ref()); //writing into a String can't fail
    PreEscaped(output)
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

/// A labelled form control, with any validation messages underneath.
pub fn form_element(id: &str, label: &str, errors: &[&str], inner: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2" {(label)}
            (inner)
            (field_errors(errors))
        }
    }
}

pub fn simple_form_element(
    id: &str,
    label: &str,
    required: bool,
    input_type: Option<&str>,
    value: &str,
    errors: &[&str],
) -> Markup {
    form_element(
        id,
        label,
        errors,
        html! {
            input type=(input_type.unwrap_or("text")) id=(id) name=(id) value=(value) required[required] class=(INPUT_CLASS);
        },
    )
}

/// A `select` over `options`, keeping `current` selected even when it isn't one of them.
pub fn select_form_element(
    id: &str,
    label: &str,
    options: &[&str],
    blank: Option<&str>,
    current: &str,
    errors: &[&str],
) -> Markup {
    let is_unlisted = !current.is_empty() && !options.contains(&current);

    form_element(
        id,
        label,
        errors,
        html! {
            select id=(id) name=(id) class=(INPUT_CLASS) {
                @if let Some(blank) = blank {
                    option value="" selected[current.is_empty()] {(blank)}
                }
                @for option in options {
                    option value=(option) selected[*option == current] {(option)}
                }
                @if is_unlisted {
                    option value=(current) selected {(current)}
                }
            }
        },
    )
}

pub fn field_errors(errors: &[&str]) -> Markup {
    html! {
        @for error in errors {
            p class="text-red-400 text-xs italic mt-1" {(error)}
        }
    }
}

pub fn alert(message: impl Render) -> Markup {
    html! {
        div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
            span {(message)}
        }
    }
}

pub fn notice(lines: &[&str]) -> Markup {
    html! {
        div class="bg-green-100 border border-green-400 text-green-700 px-4 py-3 rounded relative mb-4" role="status" {
            @for line in lines {
                p {(line)}
            }
        }
    }
}

/// Placeholder that swaps itself for `url` once the page has loaded.
pub fn loading(url: &str) -> Markup {
    html! {
        div hx-get=(url) hx-trigger="load" hx-swap="outerHTML" {
            p class="text-gray-400 italic text-center p-4" {"読み込み中..."}
        }
    }
}
