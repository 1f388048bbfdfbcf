//! Typst markup builders for tailored CVs and cover letters.
//!
//! Builders are pure string generation: all user text goes through `escape`
//! and sections with no data are omitted entirely.

use std::fmt::Write;

use crate::optimizer::cover_letter::CoverLetter;
use crate::optimizer::TailoredCv;

const CV_PREAMBLE: &str = r#"#set page(paper: "a4", margin: (x: 1.2cm, y: 1.4cm))
#set text(size: 10pt)
#set par(justify: false)

#let section(title) = [
  #v(8pt)
  #text(size: 11pt, weight: "bold")[#upper(title)]
  #v(-4pt)
  #line(length: 100%, stroke: 0.5pt)
  #v(2pt)
]
"#;

/// Escapes text interpolated into Typst markup so user content can never
/// change document structure.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '#' | '*' | '_' | '`' | '$' | '<' | '>' | '@' | '[' | ']' | '=' | '-' | '+'
            | '/' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Builds the full Typst document for a tailored CV.
pub fn cv_document(cv: &TailoredCv) -> String {
    let mut doc = String::from(CV_PREAMBLE);
    doc.push('\n');

    // Header
    if !cv.header.name.trim().is_empty() {
        let _ = writeln!(
            doc,
            "#align(center)[#text(size: 20pt, weight: \"bold\")[{}]]",
            escape(&cv.header.name)
        );

        let mut contact_parts: Vec<String> = Vec::new();
        for value in [&cv.header.email, &cv.header.phone, &cv.header.location] {
            if let Some(value) = value {
                if !value.trim().is_empty() {
                    contact_parts.push(escape(value));
                }
            }
        }
        if cv.header.linkedin.as_deref().is_some_and(|s| !s.is_empty()) {
            contact_parts.push("LinkedIn".to_string());
        }
        if cv.header.github.as_deref().is_some_and(|s| !s.is_empty()) {
            contact_parts.push("GitHub".to_string());
        }
        if !contact_parts.is_empty() {
            let _ = writeln!(doc, "#align(center)[{}]", contact_parts.join(" | "));
        }
    }

    // Professional summary
    if let Some(summary) = cv.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        doc.push_str("\n#section(\"Professional Summary\")\n");
        let _ = writeln!(doc, "{}", escape(summary));
    }

    // Education
    if !cv.education.is_empty() {
        doc.push_str("\n#section(\"Education\")\n");
        for entry in &cv.education {
            let mut institution = format!("#strong[{}]", escape(&entry.institution));
            if let Some(location) = entry.location.as_deref().filter(|s| !s.is_empty()) {
                let _ = write!(institution, ", {}", escape(location));
            }
            let _ = writeln!(doc, "{institution} \\");
            let _ = writeln!(
                doc,
                "#grid(columns: (1fr, auto), [#emph[{}]], [{}])",
                escape(&entry.degree),
                escape(entry.dates.as_deref().unwrap_or(""))
            );
            doc.push_str("#v(4pt)\n");
        }
    }

    // Skills
    if !cv.skills.is_empty() {
        doc.push_str("\n#section(\"Core Competencies\")\n");
        for (category, skills) in &cv.skills {
            if skills.is_empty() {
                continue;
            }
            let joined = skills
                .iter()
                .map(|s| escape(s))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                doc,
                "#strong[{}:] {joined} \\",
                escape(&category_display(category))
            );
        }
    }

    // Experience
    if !cv.experience.is_empty() {
        doc.push_str("\n#section(\"Professional Experience\")\n");
        for entry in &cv.experience {
            let _ = writeln!(
                doc,
                "#grid(columns: (1fr, auto), [#strong[{}]], [{}])",
                escape(&entry.title),
                escape(entry.dates.as_deref().unwrap_or(""))
            );
            let mut company = escape(&entry.company);
            if let Some(location) = entry.location.as_deref().filter(|s| !s.is_empty()) {
                let _ = write!(company, " | #emph[{}]", escape(location));
            }
            let _ = writeln!(doc, "{company}");
            for bullet in &entry.bullets {
                let _ = writeln!(doc, "- {}", escape(bullet));
            }
            doc.push_str("#v(6pt)\n");
        }
    }

    // Projects
    if !cv.projects.is_empty() {
        doc.push_str("\n#section(\"Projects\")\n");
        for project in &cv.projects {
            let mut title = format!("#strong[{}]", escape(&project.name));
            if let Some(tech) = project.technologies.as_deref().filter(|s| !s.is_empty()) {
                let _ = write!(title, " | #emph[{}]", escape(tech));
            }
            let _ = writeln!(
                doc,
                "#grid(columns: (1fr, auto), [{title}], [{}])",
                escape(project.dates.as_deref().unwrap_or(""))
            );
            if let Some(description) = project.description.as_deref().filter(|s| !s.is_empty()) {
                let _ = writeln!(doc, "- {}", escape(description));
            }
            doc.push_str("#v(4pt)\n");
        }
    }

    // Certifications
    if !cv.certifications.is_empty() {
        doc.push_str("\n#section(\"Certifications & Licenses\")\n");
        for cert in &cv.certifications {
            let mut left = escape(&cert.name);
            if let Some(issuer) = cert.issuer.as_deref().filter(|s| !s.is_empty()) {
                let _ = write!(left, " \\- {}", escape(issuer));
            }
            let _ = writeln!(
                doc,
                "#grid(columns: (1fr, auto), [{left}], [{}])",
                escape(cert.year.as_deref().unwrap_or(""))
            );
        }
    }

    doc
}

/// Builds the Typst document for a generated cover letter.
pub fn cover_letter_document(letter: &CoverLetter, job_title: &str, company_name: &str) -> String {
    let mut doc = String::from(
        "#set page(paper: \"a4\", margin: 2.5cm)\n#set text(size: 11pt)\n#set par(justify: false)\n\n",
    );

    if !letter.candidate_name.trim().is_empty() {
        let _ = writeln!(
            doc,
            "#text(size: 16pt, weight: \"bold\")[{}]\n",
            escape(&letter.candidate_name)
        );
    }

    let _ = writeln!(
        doc,
        "Re: Application for {} at {}\n",
        escape(job_title),
        escape(company_name)
    );

    let _ = writeln!(doc, "Dear {},\n", escape(&letter.recipient));

    for paragraph in &letter.paragraphs {
        let _ = writeln!(doc, "{}\n", escape(paragraph));
    }

    let _ = writeln!(doc, "{}, \\", escape(&letter.closing));
    if !letter.candidate_name.trim().is_empty() {
        let _ = writeln!(doc, "{}", escape(&letter.candidate_name));
    }

    doc
}

/// "clinical_skills" -> "Clinical Skills" for section display.
fn category_display(category: &str) -> String {
    category
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
