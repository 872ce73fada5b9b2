use crate::validate::ConfigError;
use crate::{DocumentFormat, load_document};
use htmlguard_domain::spec::ConfigurationDocument;

/// Built-in configuration installed in the global-default tier.
///
/// Both workspaces sanitize every rich-text property with the same permissive, formatting-only
/// rule set.
pub const GLOBAL_DEFAULT_YAML: &str = r#"htmlFiltering:
  formatDefinitions:
    HTML_ID: "[a-zA-Z][a-zA-Z0-9:_.-]*"
    HTML_CLASS: "[a-zA-Z0-9\\s,\\-_]+"
    NUMBER_OR_PERCENT: "[0-9]+(\\.[0-9]+)?%?|auto"
    LINK_TARGET: "_blank|_self|_parent|_top"
    NUMBER: "[0-9]+"
    LINK_REL: "[a-zA-Z\\s]+"

  editWorkspace: &policy
    strategy: SANITIZE
    process:
      - "nt:base.*"
    allowedRuleSet:
      protocols: [http, https, mailto]
      elements:
        - attributes: [id]
          format: HTML_ID
        - attributes: [class]
          format: HTML_CLASS
        - attributes: [accesskey, autocapitalize, autocorrect, autofocus, dir, draggable,
                       enterkeyhint, exportparts, hidden, inert, inputmode, lang, nonce, part,
                       popover, slot, spellcheck, style, tabindex, title, translate,
                       writingsuggestions]
        - tags: [b, big, code, del, em, i, ins, o, s, small, strike, strong, sub, sup, tt, u,
                 font, span, br, hr, wbr, abbr, cite, dfn, kbd, mark, q, samp, time, var]
        - tags: [p, div, blockquote, pre, address, section, article, aside, header, footer,
                 nav, main, figure, figcaption, details, summary]
        - tags: [h1, h2, h3, h4, h5, h6]
        - tags: [ol, ul, li, dl, dt, dd]
        - tags: [table, caption, colgroup, col, thead, tbody, tfoot, tr, th, td]
        - tags: [form, fieldset, legend, label, input, select, option, optgroup, textarea,
                 button, output, progress, meter]
        - tags: [a, img, audio, video, source, track, picture]
        - attributes: [cite]
          tags: [blockquote, q, del, ins]
        - attributes: [href, hreflang, download, name]
          tags: [a]
        - attributes: [target]
          tags: [a]
          format: LINK_TARGET
        - attributes: [rel]
          tags: [a]
          format: LINK_REL
        - attributes: [src, alt, srcset, sizes, loading, decoding]
          tags: [img, source]
        - attributes: [src, type, controls, muted, loop, autoplay, preload, poster, kind,
                       srclang, label, default, media]
          tags: [audio, video, source, track]
        - attributes: [height, width]
          tags: [img, video, table, td, th, col]
          format: NUMBER_OR_PERCENT
        - attributes: [colspan, rowspan]
          tags: [td, th]
          format: NUMBER
        - attributes: [span]
          tags: [col, colgroup]
          format: NUMBER
        - attributes: [scope, headers, abbr]
          tags: [th, td]
        - attributes: [start, reversed, type]
          tags: [ol]
        - attributes: [value]
          tags: [li]
        - attributes: [datetime]
          tags: [time, del, ins]
        - attributes: [open]
          tags: [details]
        - attributes: [color, face, size]
          tags: [font]
        - attributes: [type, name, value, checked, disabled, placeholder, readonly, required,
                       min, max, step, multiple, selected, rows, cols, for, form, low, high,
                       optimum, maxlength, minlength, pattern, size]
          tags: [input, select, option, textarea, button, label, output, progress, meter,
                 fieldset, optgroup]
    disallowedRuleSet:
      elements:
        - tags: [script, style, iframe, object, embed, applet, base, link, meta]

  liveWorkspace: *policy
"#;

/// Parse [`GLOBAL_DEFAULT_YAML`].
pub fn global_default() -> Result<ConfigurationDocument, ConfigError> {
    load_document(GLOBAL_DEFAULT_YAML, DocumentFormat::Yaml)
}
