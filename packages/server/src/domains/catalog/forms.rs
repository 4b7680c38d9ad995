//! Submitted form bodies and their validation.
//!
//! Validation is all-or-nothing: a form either passes as a whole or returns
//! every failing field at once, and nothing is persisted on failure. The
//! `tags` fields arrive as one comma-separated string and are parsed with
//! [`parse_tags`] before the lazy find-or-create pass.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use url::Url;

use super::video;

/// Field name → message map for a failed validation.
pub type FieldErrors = BTreeMap<String, String>;

/// Split a comma-separated tag field into trimmed, deduplicated names.
///
/// Deduplication is case-insensitive and keeps the first casing seen, so
/// "GIS, gis, pollution" yields `["GIS", "pollution"]`.
pub fn parse_tags(tags: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for raw in tags.split(',') {
        let name = raw.trim();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.to_lowercase()) {
            names.push(name.to_string());
        }
    }
    names
}

/// Submission form for an app.
#[derive(Debug, Clone, Deserialize)]
pub struct AppForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tags: String,
}

impl AppForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "description", &self.description);
        require_url(&mut errors, "url", &self.url);
        finish(errors)
    }
}

/// Submission form for a dataset. The URL may be left blank.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tags: String,
}

impl DatasetForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "description", &self.description);
        optional_url(&mut errors, "url", &self.url);
        finish(errors)
    }

    /// The URL as stored: a blank field becomes NULL, not an empty string.
    pub fn url_value(&self) -> Option<&str> {
        let url = self.url.trim();
        if url.is_empty() {
            None
        } else {
            Some(url)
        }
    }
}

/// Submission form for a project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: String,
}

impl ProjectForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "description", &self.description);
        require_url(&mut errors, "video_url", &self.video_url);
        // A well-formed URL on the wrong host still fails the save.
        if !errors.contains_key("video_url") {
            if let Err(error) = video::embed_url(self.video_url.trim()) {
                errors.insert("video_url".to_string(), error.to_string());
            }
        }
        finish(errors)
    }

    pub fn image_value(&self) -> Option<&str> {
        let image = self.image.trim();
        if image.is_empty() {
            None
        } else {
            Some(image)
        }
    }
}

/// Body of a support click. The project field must be present, matching the
/// front end's form payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SupportForm {
    #[serde(default)]
    pub project: String,
}

impl SupportForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "project", &self.project);
        finish(errors)
    }
}

/// Request for a dataset the catalog does not have yet.
#[derive(Debug, Clone, Deserialize)]
pub struct DataRequestForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl DataRequestForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name);
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "message", &self.message);
        finish(errors)
    }
}

/// New account registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = self.username.trim();
        if username.is_empty() {
            errors.insert("username".to_string(), "This field is required.".to_string());
        } else if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            errors.insert(
                "username".to_string(),
                "Usernames may only contain letters, numbers, hyphens and underscores.".to_string(),
            );
        }
        require_email(&mut errors, "email", &self.email);
        if self.password.is_empty() {
            errors.insert("password".to_string(), "This field is required.".to_string());
        } else if self.password.len() < 8 {
            errors.insert(
                "password".to_string(),
                "Passwords must be at least 8 characters.".to_string(),
            );
        }
        finish(errors)
    }
}

/// Login credentials. `next` carries the page to return to afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "username", &self.username);
        if self.password.is_empty() {
            errors.insert("password".to_string(), "This field is required.".to_string());
        }
        finish(errors)
    }
}

fn finish(errors: FieldErrors) -> Result<(), FieldErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn require(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), "This field is required.".to_string());
    }
}

fn require_url(errors: &mut FieldErrors, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field.to_string(), "This field is required.".to_string());
    } else if !is_http_url(value) {
        errors.insert(field.to_string(), "Enter a valid URL.".to_string());
    }
}

fn optional_url(errors: &mut FieldErrors, field: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !is_http_url(value) {
        errors.insert(field.to_string(), "Enter a valid URL.".to_string());
    }
}

fn require_email(errors: &mut FieldErrors, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field.to_string(), "This field is required.".to_string());
    } else if !is_email(value) {
        errors.insert(field.to_string(), "Enter a valid email address.".to_string());
    }
}

fn is_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_form(name: &str, description: &str, url: &str, tags: &str) -> AppForm {
        AppForm {
            name: name.to_string(),
            description: description.to_string(),
            url: url.to_string(),
            tags: tags.to_string(),
        }
    }

    #[test]
    fn test_parse_tags_splits_and_trims() {
        assert_eq!(parse_tags("GIS, pollution"), vec!["GIS", "pollution"]);
        assert_eq!(parse_tags("  GIS ,, pollution ,"), vec!["GIS", "pollution"]);
    }

    #[test]
    fn test_parse_tags_dedupes_case_insensitively() {
        assert_eq!(parse_tags("GIS, gis, GIS"), vec!["GIS"]);
        assert_eq!(parse_tags("transit, Transit, TRANSIT, bus"), vec!["transit", "bus"]);
    }

    #[test]
    fn test_parse_tags_of_nothing_is_empty() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_app_form_requires_every_field() {
        let errors = app_form("", "", "", "").validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["name"], "This field is required.");
        assert_eq!(errors["description"], "This field is required.");
        assert_eq!(errors["url"], "This field is required.");
    }

    #[test]
    fn test_app_form_rejects_a_malformed_url() {
        let errors = app_form("Test", "A test app.", "not a url", "")
            .validate()
            .unwrap_err();
        assert_eq!(errors["url"], "Enter a valid URL.");
    }

    #[test]
    fn test_app_form_accepts_a_complete_submission() {
        let form = app_form("Test", "A test app.", "http://testapp.com", "GIS, test");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_dataset_url_is_optional() {
        let form = DatasetForm {
            name: "My Data".to_string(),
            description: "Test data.".to_string(),
            url: String::new(),
            tags: String::new(),
        };
        assert!(form.validate().is_ok());
        assert_eq!(form.url_value(), None);
    }

    #[test]
    fn test_dataset_url_still_has_to_parse_when_given() {
        let form = DatasetForm {
            name: "My Data".to_string(),
            description: "Test data.".to_string(),
            url: "ftp:/broken".to_string(),
            tags: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors["url"], "Enter a valid URL.");
    }

    #[test]
    fn test_project_form_rejects_unknown_video_hosts() {
        let form = ProjectForm {
            name: "Test".to_string(),
            description: "A test cause.".to_string(),
            organization: String::new(),
            video_url: "https://www.dailymotion.com/video/x2hwqn9".to_string(),
            image: String::new(),
            tags: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors["video_url"].contains("Unsupported video host"));
    }

    #[test]
    fn test_project_form_accepts_vimeo() {
        let form = ProjectForm {
            name: "Test".to_string(),
            description: "A test cause.".to_string(),
            organization: "City Hall".to_string(),
            video_url: "http://vimeo.com/12345".to_string(),
            image: String::new(),
            tags: "test, data".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_support_form_requires_the_project_field() {
        let empty = SupportForm {
            project: String::new(),
        };
        assert!(empty.validate().is_err());

        let given = SupportForm {
            project: "test".to_string(),
        };
        assert!(given.validate().is_ok());
    }

    #[test]
    fn test_data_request_checks_the_email_shape() {
        let form = DataRequestForm {
            name: "Foo".to_string(),
            email: "not-an-email".to_string(),
            message: "Where is the crime data?".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors["email"], "Enter a valid email address.");
    }

    #[test]
    fn test_register_form_rejects_odd_usernames() {
        let form = RegisterForm {
            username: "foo bar!".to_string(),
            email: "foo@bar.com".to_string(),
            password: "hunter2hunter2".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors["username"].contains("letters, numbers"));
    }

    #[test]
    fn test_register_form_wants_a_longer_password() {
        let form = RegisterForm {
            username: "foo".to_string(),
            email: "foo@bar.com".to_string(),
            password: "short".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors["password"].contains("at least 8"));
    }
}
