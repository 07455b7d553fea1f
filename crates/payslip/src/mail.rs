//! Mail envelopes for generated slips
//!
//! The transport is left to a [`MailSink`]. Attachments are located by
//! re-deriving the slip's file name from the record, so a slip must have
//! been generated for the same period and output directory first.

use crate::fields::Field;
use crate::filename::derive_filename;
use crate::record::Record;
use crate::sheet::CompanyInfo;
use log::{info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A message ready for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailEnvelope {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachment: PathBuf,
}

/// Why a record cannot be mailed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("No valid email address for {name}")]
    MissingRecipient { name: String },

    #[error("Slip not found at {0}")]
    MissingAttachment(PathBuf),
}

/// Delivers envelopes (SMTP, an outbox, a test double)
pub trait MailSink {
    type Error: fmt::Display;

    fn send(&mut self, envelope: &MailEnvelope) -> Result<(), Self::Error>;
}

/// Sent and failed counts of a dispatch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
}

const UNKNOWN_NAME: &str = "Unknown";

/// Build the envelope for one record's slip in `output_dir`
pub fn prepare_envelope(
    record: &Record,
    period: &str,
    company: &CompanyInfo,
    output_dir: &Path,
) -> Result<MailEnvelope, EnvelopeError> {
    let name = Field::EmployeeName.text(record).unwrap_or(UNKNOWN_NAME);

    let recipient = Field::Email
        .text(record)
        .filter(|email| email.contains('@'))
        .ok_or_else(|| EnvelopeError::MissingRecipient {
            name: name.to_string(),
        })?;

    let attachment = output_dir.join(derive_filename(record, period));
    if !attachment.is_file() {
        return Err(EnvelopeError::MissingAttachment(attachment));
    }

    Ok(MailEnvelope {
        recipient: recipient.to_string(),
        subject: format!("Salary Statement - {period}"),
        body: mail_body(name, period, company),
        attachment,
    })
}

fn mail_body(name: &str, period: &str, company: &CompanyInfo) -> String {
    let mut body = format!(
        "Dear {name},\n\n\
         Please find attached your salary statement for {period}.\n\n\
         If you have any questions, please contact HR.\n\n\
         Best regards,\n\
         HR Department"
    );
    let company_name = company.company_name.trim();
    if !company_name.is_empty() {
        body.push('\n');
        body.push_str(company_name);
    }
    body
}

/// Mail every record's slip in order, counting successes and failures
pub fn dispatch<S: MailSink>(
    sink: &mut S,
    records: &[Record],
    period: &str,
    company: &CompanyInfo,
    output_dir: &Path,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for record in records {
        let envelope = match prepare_envelope(record, period, company, output_dir) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!("Skipping mail: {err}");
                report.failed += 1;
                continue;
            }
        };

        match sink.send(&envelope) {
            Ok(()) => report.sent += 1,
            Err(err) => {
                warn!("Failed to send to {}: {err}", envelope.recipient);
                report.failed += 1;
            }
        }
    }

    info!("Mail for {period}: {} sent, {} failed", report.sent, report.failed);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[derive(Default)]
    struct Outbox {
        sent: Vec<MailEnvelope>,
        reject: Option<String>,
    }

    impl MailSink for Outbox {
        type Error = String;

        fn send(&mut self, envelope: &MailEnvelope) -> Result<(), String> {
            if self.reject.as_deref() == Some(envelope.recipient.as_str()) {
                return Err("mailbox unavailable".to_string());
            }
            self.sent.push(envelope.clone());
            Ok(())
        }
    }

    fn company() -> CompanyInfo {
        CompanyInfo {
            company_name: "TECH EMULSION".to_string(),
            app_name: "Payroll".to_string(),
        }
    }

    fn record(name: &str, email: &str) -> Record {
        [("Name", name), ("Email Address", email)].into_iter().collect()
    }

    fn touch(dir: &Path, record: &Record, period: &str) {
        fs::write(dir.join(derive_filename(record, period)), b"%PDF-1.5").unwrap();
    }

    #[test]
    fn test_prepare_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let r = record("Ali Raza", "ali@example.com");
        touch(dir.path(), &r, "March 2025");

        let envelope = prepare_envelope(&r, "March 2025", &company(), dir.path()).unwrap();

        assert_eq!(envelope.recipient, "ali@example.com");
        assert_eq!(envelope.subject, "Salary Statement - March 2025");
        assert_eq!(envelope.attachment, dir.path().join("March_2025_Ali_Raza.pdf"));
        assert_eq!(
            envelope.body,
            "Dear Ali Raza,\n\n\
             Please find attached your salary statement for March 2025.\n\n\
             If you have any questions, please contact HR.\n\n\
             Best regards,\n\
             HR Department\n\
             TECH EMULSION"
        );
    }

    #[test]
    fn test_body_without_name_or_company() {
        let body = mail_body(UNKNOWN_NAME, "May", &CompanyInfo::default());
        assert!(body.starts_with("Dear Unknown,"));
        assert!(body.ends_with("HR Department"));
    }

    #[test]
    fn test_invalid_recipient() {
        let dir = tempfile::tempdir().unwrap();
        let r = record("Sara", "not-an-address");

        assert_eq!(
            prepare_envelope(&r, "May", &company(), dir.path()),
            Err(EnvelopeError::MissingRecipient {
                name: "Sara".to_string()
            })
        );
    }

    #[test]
    fn test_missing_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let r = record("Sara", "sara@example.com");

        let err = prepare_envelope(&r, "May", &company(), dir.path()).unwrap_err();
        assert_eq!(err, EnvelopeError::MissingAttachment(dir.path().join("May_Sara.pdf")));
    }

    #[test]
    fn test_dispatch_counts() {
        let dir = tempfile::tempdir().unwrap();
        let ok = record("Ali", "ali@example.com");
        let rejected = record("Omar", "omar@example.com");
        let no_email = record("Sara", "");
        let no_slip = record("Zainab", "zainab@example.com");
        for r in [&ok, &rejected, &no_email] {
            touch(dir.path(), r, "June");
        }

        let mut outbox = Outbox {
            reject: Some("omar@example.com".to_string()),
            ..Outbox::default()
        };
        let report = dispatch(
            &mut outbox,
            &[ok, rejected, no_email, no_slip],
            "June",
            &company(),
            dir.path(),
        );

        assert_eq!(report, DispatchReport { sent: 1, failed: 3 });
        assert_eq!(outbox.sent.len(), 1);
        assert_eq!(outbox.sent[0].recipient, "ali@example.com");
    }
}
