//! Prompt Fragment
//!
//! Markup, style and script spliced into gated pages. The fragment depends
//! only on configuration, so it is rendered once when the gate is built.
//!
//! The script posts `age_verification_action=verify_age` back to the current
//! URL as a urlencoded form and reacts to the JSON result: reload on success,
//! follow `redirect` on denial, otherwise show `message` in the error slot.

use crate::application::config::{GateConfig, PromptMode};
use crate::domain::birth_date::FieldOrder;
use crate::presentation::dto::{ACTION_FIELD, VERIFY_ACTION};

/// Renders the prompt fragment for a configuration
pub trait PromptRenderer {
    fn render(&self, config: &GateConfig) -> String;
}

/// Built-in overlay with yes/no buttons or date of birth fields
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPrompt;

struct DateField {
    label: &'static str,
    min: u16,
    max: u16,
    max_len: u8,
}

const MONTH: DateField = DateField {
    label: "MM",
    min: 1,
    max: 12,
    max_len: 2,
};
const DAY: DateField = DateField {
    label: "DD",
    min: 1,
    max: 31,
    max_len: 2,
};
const YEAR: DateField = DateField {
    label: "YYYY",
    min: 1900,
    max: 2100,
    max_len: 4,
};

fn date_fields(order: FieldOrder) -> [DateField; 3] {
    match order {
        FieldOrder::Mdy => [MONTH, DAY, YEAR],
        FieldOrder::Dmy => [DAY, MONTH, YEAR],
        FieldOrder::Ymd => [YEAR, MONTH, DAY],
    }
}

const FIELD_IDS: [&str; 3] = ["birth-first", "birth-second", "birth-third"];

const STYLE: &str = "
#age-verification-overlay{position:fixed;inset:0;z-index:99999;display:flex;align-items:center;justify-content:center;padding:1rem;background:rgba(0,0,0,.85);transition:opacity .3s}
#age-verification-overlay.is-hidden{opacity:0}
.age-gate-modal{width:100%;max-width:28rem;background:#fff;color:#111;border-radius:.5rem;padding:2rem;font-family:sans-serif;text-align:center}
.age-gate-actions{display:flex;gap:.75rem;margin-top:1.5rem}
.age-gate-actions button{flex:1;padding:.75rem 1.5rem;font-weight:600;border:0;border-radius:.25rem;cursor:pointer}
.age-gate-actions button:disabled{opacity:.5;cursor:not-allowed}
.age-gate-fields{display:flex;gap:.5rem;justify-content:center;margin-top:.75rem}
.age-gate-fields input{width:4.5rem;padding:.5rem;text-align:center}
.age-gate-fields input::-webkit-outer-spin-button,.age-gate-fields input::-webkit-inner-spin-button{-webkit-appearance:none;margin:0}
.age-gate-fields input[type=number]{-moz-appearance:textfield}
.age-gate-agreement{margin-top:1.5rem;font-size:.75rem}
#age-verification-error{margin-top:1rem;color:#b91c1c}
#age-verification-error.is-hidden{display:none}
";

const SCRIPT: &str = r#"
(function () {
  var overlay = document.getElementById('age-verification-overlay');
  if (!overlay) return;
  var order = overlay.getAttribute('data-date-format');
  var confirmBtn = document.getElementById('age-confirm-btn');
  var denyBtn = document.getElementById('age-deny-btn');
  var errorDiv = document.getElementById('age-verification-error');
  var inputs = ['birth-first', 'birth-second', 'birth-third'].map(function (id) {
    return document.getElementById(id);
  });
  var hasDate = inputs.every(function (el) { return el; });

  if (hasDate) {
    inputs.forEach(function (el, i) {
      el.addEventListener('input', function () {
        var max = parseInt(el.getAttribute('maxlength'), 10);
        if (el.value.length > max) el.value = el.value.slice(0, max);
        if (el.value.length === max && inputs[i + 1]) inputs[i + 1].focus();
      });
      el.addEventListener('keydown', function (e) {
        if (e.key === 'Backspace' && !el.value && inputs[i - 1]) inputs[i - 1].focus();
      });
    });
  }

  function birthDate() {
    var v = inputs.map(function (el) { return el.value.trim(); });
    var y, m, d;
    if (order === 'dmy') { d = v[0]; m = v[1]; y = v[2]; }
    else if (order === 'ymd') { y = v[0]; m = v[1]; d = v[2]; }
    else { m = v[0]; d = v[1]; y = v[2]; }
    if (!y || !m || !d || y.length !== 4) return null;
    return y + '-' + m.padStart(2, '0') + '-' + d.padStart(2, '0');
  }

  function setBusy(busy) {
    if (confirmBtn) confirmBtn.disabled = busy;
    if (denyBtn) denyBtn.disabled = busy;
  }

  function showError(message) {
    if (!errorDiv) return;
    errorDiv.textContent = message;
    errorDiv.classList.remove('is-hidden');
    setBusy(false);
  }

  function submit(confirmed) {
    var form = new URLSearchParams();
    form.append('__ACTION_FIELD__', '__VERIFY_ACTION__');
    form.append('age_confirmed', confirmed);
    if (hasDate) {
      var date = birthDate();
      if (date) form.append('birth_date', date);
    }
    setBusy(true);
    fetch(window.location.href, {
      method: 'POST',
      body: form,
      credentials: 'same-origin'
    })
      .then(function (res) { return res.json(); })
      .then(function (data) {
        if (data.success) {
          overlay.classList.add('is-hidden');
          setTimeout(function () { window.location.reload(); }, 300);
        } else if (data.redirect) {
          window.location.href = data.redirect;
        } else {
          showError(data.message);
        }
      })
      .catch(function () { showError('An error occurred. Please try again.'); });
  }

  if (confirmBtn) confirmBtn.addEventListener('click', function (e) { e.preventDefault(); submit('yes'); });
  if (denyBtn) denyBtn.addEventListener('click', function (e) { e.preventDefault(); submit('no'); });
  document.body.style.overflow = 'hidden';
})();
"#;

impl PromptRenderer for DefaultPrompt {
    fn render(&self, config: &GateConfig) -> String {
        let text = &config.prompt;
        let mut html = String::with_capacity(8 * 1024);

        html.push_str(&format!(
            "<div id=\"age-verification-overlay\" data-date-format=\"{}\">\
             <div class=\"age-gate-modal\" role=\"dialog\" aria-modal=\"true\">\
             <h2>{}</h2><p>{}</p>",
            config.date_format.as_str(),
            escape_html(&text.modal_title),
            escape_html(&config.with_age(&text.modal_text)),
        ));

        let confirm = escape_html(&config.with_age(&text.confirm_button_text));
        match config.mode() {
            PromptMode::DateOfBirth => {
                render_date_fields(&mut html, config);
                html.push_str(&format!(
                    "<div class=\"age-gate-actions\">\
                     <button type=\"button\" id=\"age-confirm-btn\">{confirm}</button></div>"
                ));
            }
            PromptMode::Confirmation => {
                let deny = escape_html(&config.with_age(&text.deny_button_text));
                html.push_str(&format!(
                    "<div class=\"age-gate-actions\">\
                     <button type=\"button\" id=\"age-confirm-btn\">{confirm}</button>\
                     <button type=\"button\" id=\"age-deny-btn\">{deny}</button></div>"
                ));
            }
        }

        if text.show_agreement {
            html.push_str(&format!(
                "<div class=\"age-gate-agreement\"><p>{}</p>\
                 <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">PRIVACY POLICY</a> | \
                 <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">TERMS OF USE</a></div>",
                escape_html(&text.agreement_text),
                escape_html(&text.privacy_policy_url),
                escape_html(&text.terms_of_use_url),
            ));
        }

        html.push_str("<div id=\"age-verification-error\" class=\"is-hidden\" role=\"alert\"></div>");
        html.push_str("</div></div>");

        let script = SCRIPT
            .replace("__ACTION_FIELD__", ACTION_FIELD)
            .replace("__VERIFY_ACTION__", VERIFY_ACTION);
        html.push_str(&format!("<style>{STYLE}</style><script>{script}</script>"));

        html
    }
}

fn render_date_fields(html: &mut String, config: &GateConfig) {
    html.push_str(&format!(
        "<div class=\"age-gate-date\"><label>{}</label><div class=\"age-gate-fields\">",
        escape_html(&config.prompt.date_picker_text)
    ));

    for (id, field) in FIELD_IDS.iter().zip(date_fields(config.date_format)) {
        html.push_str(&format!(
            "<label><span>{label}</span>\
             <input type=\"number\" id=\"{id}\" placeholder=\"{label}\" \
             min=\"{min}\" max=\"{max}\" maxlength=\"{len}\" required></label>",
            label = field.label,
            min = field.min,
            max = field.max,
            len = field.max_len,
        ));
    }

    html.push_str("</div></div>");
}

/// Escape text for use in element content and quoted attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
