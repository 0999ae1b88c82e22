//! Filter rule parser
//!
//! Compiles one line of the declarative rule syntax into an executable
//! [`Filter`]. The grammar is `<matcher>[$<opt1>,<opt2>,...]`; the matcher
//! is either literal text with `*`/`^`/`|` metacharacters or a `/regex/`
//! escape hatch, and options restrict party, origin, and resource type or
//! name a redirect asset.
//!
//! Every failure here is per-line: batch loading counts invalid lines and
//! moves on.

use regex::{Regex, RegexBuilder};

use wf_core::filter::Filter;
use wf_core::types::{DomainToken, ResourceType};

use crate::error::CompileError;

/// Result of compiling a whole configuration text.
#[derive(Debug, Default)]
pub struct ParsedList {
    pub filters: Vec<Filter>,
    /// Lines that failed to compile and were dropped.
    pub invalid: usize,
}

/// Compile a configuration text, one rule per line.
///
/// Blank lines and comments (`!`, or `#` not followed by `#`) are skipped;
/// lines that fail to compile are counted and dropped.
pub fn parse_filter_list(text: &str) -> ParsedList {
    let mut parsed = ParsedList::default();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('!') || (line.starts_with('#') && !line.starts_with("##")) {
            continue;
        }

        match parse_filter(line) {
            Ok(filter) => parsed.filters.push(filter),
            Err(err) => {
                parsed.invalid += 1;
                log::debug!("could not parse the filter '{line}': {err}");
            }
        }
    }

    if parsed.invalid > 0 {
        log::warn!("could not parse {} filters", parsed.invalid);
    }

    parsed
}

/// Compile a single trimmed, non-comment rule line.
pub fn parse_filter(line: &str) -> Result<Filter, CompileError> {
    // The options part starts at the last '$'; no '$' means no options.
    let (matcher_part, options_part) = match line.rfind('$') {
        Some(pos) => (line[..pos].trim(), line[pos + 1..].trim()),
        None => (line.trim(), ""),
    };

    if matcher_part.starts_with("@@") {
        return Err(CompileError::ExceptionFilter);
    }

    let options = parse_options(options_part)?;
    let pattern = compile_pattern(matcher_part)?;

    Ok(Filter {
        pattern,
        domain_include: options.domain_include,
        domain_exclude: options.domain_exclude,
        type_include: options.type_include,
        type_exclude: options.type_exclude,
        redirect: options.redirect,
    })
}

// =============================================================================
// Options
// =============================================================================

/// A recognized option keyword, parsed before any semantic validation.
enum OptionKeyword<'a> {
    Important,
    FirstParty,
    ThirdParty,
    Redirect(&'a str),
    DomainList(&'a str),
    Type(ResourceType),
}

fn classify_keyword(body: &str) -> Option<OptionKeyword<'_>> {
    if body == "important" {
        return Some(OptionKeyword::Important);
    }
    if body == "first-party" {
        return Some(OptionKeyword::FirstParty);
    }
    if body == "third-party" {
        return Some(OptionKeyword::ThirdParty);
    }
    if let Some(name) = body.strip_prefix("redirect=") {
        return Some(OptionKeyword::Redirect(name));
    }
    if let Some(list) = body.strip_prefix("domain=") {
        return Some(OptionKeyword::DomainList(list));
    }
    ResourceType::from_option(body).map(OptionKeyword::Type)
}

struct ParsedOptions {
    domain_include: Vec<DomainToken>,
    domain_exclude: Vec<DomainToken>,
    type_include: ResourceType,
    type_exclude: ResourceType,
    redirect: Option<String>,
}

fn parse_options(text: &str) -> Result<ParsedOptions, CompileError> {
    let mut options = ParsedOptions {
        domain_include: Vec::new(),
        domain_exclude: Vec::new(),
        type_include: ResourceType::empty(),
        type_exclude: ResourceType::empty(),
        redirect: None,
    };

    // Once a domain= group is open, later tokens that are not recognized
    // keywords are treated as further comma-separated domain entries.
    let mut in_domain_list = false;

    for raw in text.split(',') {
        let token = raw.trim();
        if token.is_empty() {
            continue;
        }

        let (negated, body) = match token.strip_prefix('~') {
            Some(rest) => (true, rest),
            None => (false, token),
        };

        match classify_keyword(body) {
            // Recognized but carries no behavior of its own.
            Some(OptionKeyword::Important) => {}
            Some(OptionKeyword::FirstParty) => {
                if negated {
                    options.domain_exclude.push(DomainToken::SameOrigin);
                } else {
                    options.domain_include.push(DomainToken::SameOrigin);
                }
            }
            Some(OptionKeyword::ThirdParty) => {
                if negated {
                    options.domain_include.push(DomainToken::SameOrigin);
                } else {
                    options.domain_exclude.push(DomainToken::SameOrigin);
                }
            }
            Some(OptionKeyword::Redirect(name)) => {
                options.redirect = Some(name.to_string());
            }
            Some(OptionKeyword::DomainList(first)) => {
                in_domain_list = true;
                if !first.is_empty() {
                    push_domain_entry(&mut options, first);
                }
            }
            Some(OptionKeyword::Type(rtype)) => {
                if negated {
                    options.type_exclude |= rtype;
                } else {
                    options.type_include |= rtype;
                }
            }
            None if in_domain_list => push_domain_entry(&mut options, token),
            None => return Err(CompileError::UnsupportedOption(token.to_string())),
        }
    }

    validate_domains(&options)?;
    Ok(options)
}

fn push_domain_entry(options: &mut ParsedOptions, entry: &str) {
    match entry.strip_prefix('~') {
        Some(domain) => options
            .domain_exclude
            .push(DomainToken::Literal(domain.to_string())),
        None => options
            .domain_include
            .push(DomainToken::Literal(entry.to_string())),
    }
}

fn validate_domains(options: &ParsedOptions) -> Result<(), CompileError> {
    let include_sentinel = options.domain_include.contains(&DomainToken::SameOrigin);
    let exclude_sentinel = options.domain_exclude.contains(&DomainToken::SameOrigin);

    if include_sentinel && exclude_sentinel {
        return Err(CompileError::ConflictingParty);
    }
    if include_sentinel && options.domain_include.len() > 1 {
        return Err(CompileError::PartyWithDomains("first-party"));
    }
    if exclude_sentinel && options.domain_exclude.len() > 1 {
        return Err(CompileError::PartyWithDomains("third-party"));
    }

    Ok(())
}

// =============================================================================
// Patterns
// =============================================================================

/// Compile the matcher part into a case-insensitive regular expression.
fn compile_pattern(matcher: &str) -> Result<Regex, regex::Error> {
    // Empty matcher and bare '*' match any non-empty URL.
    if matcher.is_empty() || matcher == "*" {
        return build_case_insensitive(r"[\s\S]");
    }

    // Author-supplied regex escape hatch.
    if matcher.len() > 2 && matcher.starts_with('/') && matcher.ends_with('/') {
        return build_case_insensitive(&matcher[1..matcher.len() - 1]);
    }

    let mut rest = matcher;
    let mut source = String::with_capacity(matcher.len() * 2 + 24);

    // Start anchor
    if let Some(stripped) = rest.strip_prefix('|') {
        source.push('^');
        rest = stripped;

        // Domain anchor, must be processed after the start anchor
        if let Some(stripped) = rest.strip_prefix('|') {
            source.push_str(r"https?://(?:[^./]+\.)*");
            rest = stripped;
        }
    }

    // End anchor
    let anchored_end = match rest.strip_suffix('|') {
        Some(stripped) => {
            rest = stripped;
            true
        }
        None => false,
    };

    for c in rest.chars() {
        match c {
            // General regex escape; '*' and '^' are rewritten below instead
            '\\' | '$' | '+' | '?' | '.' | '(' | ')' | '|' | '[' | ']' | '{' | '}' => {
                source.push('\\');
                source.push(c);
            }
            // Wildcard matcher
            '*' => source.push_str(r"[\s\S]*"),
            // Separator matcher
            '^' => source.push_str(r"(?:[/:?=&]|$)"),
            _ => source.push(c),
        }
    }

    if anchored_end {
        source.push('$');
    }

    build_case_insensitive(&source)
}

fn build_case_insensitive(source: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source).case_insensitive(true).build()
}
