use codefold_core::processing::DisplayProcessor;
use codefold_core::{Command, EditorConfig, EditorSession, FoldCommand};
use codefold_highlight::{SyntaxHighlighter, TokenKind, highlight};
use codefold_lang::Language;
use pretty_assertions::assert_eq;

const SAMPLES: &[(Language, &str)] = &[
    (
        Language::JavaScript,
        "function add(a, b) {\n  // sum\n  return a + b * 2;\n}\nconst s = `x${1}`;",
    ),
    (
        Language::TypeScript,
        "interface P { x: number }\nlet p: P = { x: 0.5 };",
    ),
    (
        Language::Python,
        "def f(x):\n    \"\"\"doc\"\"\"\n    return x ** 2  # square",
    ),
    (Language::Css, "/* c */\nbody {\n  margin: 0 auto;\n  color: #fff;\n}"),
    (Language::Json, "{\"a\": [1, true, null], \"b\": \"s\"}"),
    (
        Language::Html,
        "<!-- top -->\n<div class=\"a\" hidden>\n  <img src='x.png'/>\n</div>",
    ),
    (Language::PlainText, "just < text & stuff"),
];

#[test]
fn test_tokens_reconstruct_input() {
    for (language, text) in SAMPLES {
        let tokens = SyntaxHighlighter::new(*language).unwrap().tokenize(text);
        let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(&joined, text, "{language}");
    }
}

#[test]
fn test_output_is_deterministic() {
    for (language, text) in SAMPLES {
        let first = highlight(text, *language).unwrap();
        for _ in 0..3 {
            assert_eq!(highlight(text, *language).unwrap(), first);
        }
    }
}

#[test]
fn test_markup_never_leaks_raw_brackets() {
    for (language, text) in SAMPLES {
        let out = highlight(text, *language).unwrap();
        let stripped = out
            .replace("</span>", "")
            .split("<span class=\"tok-")
            .map(|part| part.split_once("\">").map_or(part, |(_, rest)| rest))
            .collect::<String>();
        assert!(!stripped.contains('<'), "{language}: {out}");
        assert!(!stripped.contains('>'), "{language}: {out}");
    }
}

#[test]
fn test_html_comment_run_is_one_token() {
    let tokens = SyntaxHighlighter::new(Language::Html)
        .unwrap()
        .tokenize("<!-- <b>x</b> -->");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Comment);
}

#[test]
fn test_highlights_display_text_of_folded_session() {
    let mut session = EditorSession::new(
        "if (x) {\n  return \"hidden\";\n}",
        EditorConfig::for_language(Language::JavaScript),
    );
    session.execute(Command::Fold(FoldCommand::Toggle { line: 0 }));

    let mut highlighter = SyntaxHighlighter::new(Language::JavaScript).unwrap();
    let out = highlighter.process(session.document()).unwrap();
    assert!(!out.contains("hidden"));
    assert!(out.contains("<span class=\"tok-keyword\">if</span>"));
    assert!(out.contains(" ... "));
}
