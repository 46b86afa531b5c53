//! Script and stylesheet post-processing.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Both entry points return
//! the tool's own message on failure; callers attach the offending file.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::Targets;
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Sources are classic browser scripts: top-level declarations are page
/// globals and must survive minification.
fn script_type() -> SourceType {
    SourceType::script()
}

/// Parse a script and report the first syntax error, if any.
pub fn check_js(source: &str) -> Result<(), String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, script_type()).parse();
    match ret.errors.first() {
        Some(err) => Err(err.to_string()),
        None if ret.panicked => Err("parser aborted".into()),
        None => Ok(()),
    }
}

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Result<String, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, script_type()).parse();
    if let Some(err) = ret.errors.first() {
        return Err(err.to_string());
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Add vendor prefixes for `targets` and optionally minify.
///
/// `filename` only shows up in error locations.
pub fn process_css(
    source: &str,
    filename: &str,
    targets: Targets,
    minify: bool,
) -> Result<String, String> {
    let options = ParserOptions {
        filename: filename.to_string(),
        ..ParserOptions::default()
    };
    let mut stylesheet = StyleSheet::parse(source, options).map_err(|e| e.to_string())?;
    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| e.to_string())?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightningcss::targets::Browsers;

    #[test]
    fn test_minify_js_shrinks() {
        let src = "function greet(name) {\n  // hello\n  return 'hi ' + name;\n}\nwindow.greet = greet;\n";
        let out = minify_js(src).unwrap();
        assert!(out.len() < src.len());
        assert!(!out.contains("// hello"));
        assert!(out.contains("window.greet"));
    }

    #[test]
    fn test_minify_js_keeps_top_level_declarations() {
        assert_eq!(minify_js("var a=1;\nvar b=2;").unwrap(), "var a=1,b=2;");
    }

    #[test]
    fn test_check_js_reports_error() {
        assert!(check_js("var a = 1;").is_ok());
        assert!(check_js("function (").is_err());
    }

    #[test]
    fn test_process_css_minifies() {
        let out = process_css("a {\n  color: red;\n}\n", "site.css", Targets::default(), true).unwrap();
        assert_eq!(out, "a{color:red}");
    }

    #[test]
    fn test_process_css_keeps_formatting_when_not_minifying() {
        let out = process_css("a { color: red }", "site.css", Targets::default(), false).unwrap();
        assert!(out.contains('\n'));
    }

    #[test]
    fn test_process_css_prefixes_for_old_browsers() {
        let targets = Targets::from(Browsers {
            safari: Some(9 << 16),
            ..Browsers::default()
        });
        let out = process_css(".a { user-select: none }", "site.css", targets, true).unwrap();
        assert!(out.contains("-webkit-user-select"));
    }

    #[test]
    fn test_process_css_error() {
        let bad = process_css("a[ { color: red }", "site.css", Targets::default(), true);
        assert!(bad.is_err());
    }
}
