//! Fixed completion vocabularies.

/// HTML element names offered as completions.
pub const HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "article", "aside", "audio", "b", "blockquote", "body", "br",
    "button", "canvas", "caption", "code", "dd", "details", "dialog", "div", "dl", "dt", "em",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "head", "header", "hr", "html", "i", "iframe", "img", "input", "label", "legend", "li",
    "link", "main", "meta", "nav", "ol", "option", "p", "pre", "script", "section", "select",
    "small", "span", "strong", "style", "summary", "table", "tbody", "td", "template",
    "textarea", "tfoot", "th", "thead", "title", "tr", "ul", "video",
];

/// CSS property names offered as completions.
pub const CSS_PROPERTIES: &[&str] = &[
    "align-items", "animation", "background", "background-color", "background-image",
    "border", "border-color", "border-radius", "bottom", "box-shadow", "box-sizing", "color",
    "cursor", "display", "flex", "flex-direction", "flex-wrap", "font", "font-family",
    "font-size", "font-weight", "gap", "grid", "grid-template-columns", "height",
    "justify-content", "left", "letter-spacing", "line-height", "margin", "margin-bottom",
    "margin-left", "margin-right", "margin-top", "max-height", "max-width", "min-height",
    "min-width", "opacity", "outline", "overflow", "padding", "padding-bottom",
    "padding-left", "padding-right", "padding-top", "pointer-events", "position", "right",
    "text-align", "text-decoration", "text-transform", "top", "transform", "transition",
    "visibility", "white-space", "width", "z-index",
];

/// JavaScript keywords and common literals.
pub const JAVASCRIPT_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
    "function", "if", "import", "in", "instanceof", "let", "new", "null", "of", "return",
    "static", "super", "switch", "this", "throw", "true", "try", "typeof", "undefined", "var",
    "void", "while", "with", "yield",
];

/// TypeScript keywords: the JavaScript set plus type-level words.
pub const TYPESCRIPT_KEYWORDS: &[&str] = &[
    "abstract", "any", "as", "async", "await", "boolean", "break", "case", "catch", "class",
    "const", "constructor", "continue", "debugger", "declare", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "implements", "import", "in", "instanceof", "interface", "keyof", "let", "namespace",
    "never", "new", "null", "number", "of", "private", "protected", "public", "readonly",
    "return", "static", "string", "super", "switch", "this", "throw", "true", "try", "type",
    "typeof", "undefined", "unknown", "var", "void", "while", "with", "yield",
];

/// Python keywords and builtin constants.
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "self", "try", "while", "with", "yield",
];
