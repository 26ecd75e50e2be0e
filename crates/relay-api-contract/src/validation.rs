//! Validation helpers for contract types

use crate::error::ApiContractError;
use crate::types::*;
use validator::Validate;

/// Validate an outbound dispatch request
pub fn validate_dispatch_request(request: &DispatchRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a registry entry URL against the canonical shape
/// `https://<host>/<owner>/<name>`: https scheme, exactly two non-empty
/// path segments, no trailing slash, no query or fragment.
pub fn validate_repository_url(url_str: &str) -> Result<(), ApiContractError> {
    if url_str.ends_with('/') {
        return Err(ApiContractError::InvalidRepositoryUrl(format!(
            "trailing slash not allowed: {url_str}"
        )));
    }

    let url = url::Url::parse(url_str)?;
    if url.scheme() != "https" {
        return Err(ApiContractError::InvalidRepositoryUrl(format!(
            "expected https scheme, got '{}'",
            url.scheme()
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ApiContractError::InvalidRepositoryUrl(format!(
            "query and fragment not allowed: {url_str}"
        )));
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.collect())
        .unwrap_or_default();
    if segments.len() != 2 || segments.iter().any(|s| s.is_empty()) {
        return Err(ApiContractError::InvalidRepositoryUrl(format!(
            "expected exactly <owner>/<name> path: {url_str}"
        )));
    }

    Ok(())
}

/// Validate an `owner/name` repository full name
pub fn validate_full_name(full_name: &str) -> Result<(), ApiContractError> {
    let mut parts = full_name.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(()),
        _ => Err(ApiContractError::InvalidFullName(full_name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_repository_url_passes() {
        validate_repository_url("https://github.com/acme/widgets").unwrap();
    }

    #[test]
    fn trailing_slash_is_rejected() {
        assert!(validate_repository_url("https://github.com/acme/widgets/").is_err());
    }

    #[test]
    fn non_https_is_rejected() {
        assert!(validate_repository_url("http://github.com/acme/widgets").is_err());
    }

    #[test]
    fn extra_path_segments_are_rejected() {
        assert!(validate_repository_url("https://github.com/acme/widgets/tree/main").is_err());
        assert!(validate_repository_url("https://github.com/acme").is_err());
    }

    #[test]
    fn full_name_requires_owner_and_name() {
        validate_full_name("acme/widgets").unwrap();
        assert!(validate_full_name("acme").is_err());
        assert!(validate_full_name("acme/").is_err());
        assert!(validate_full_name("/widgets").is_err());
        assert!(validate_full_name("a/b/c").is_err());
    }

    #[test]
    fn dispatch_request_requires_repository_and_commit() {
        let request = DispatchRequest {
            repository: String::new(),
            commit_id: "f88f7bd".into(),
            commit_message: String::new(),
            commit_author: "octocat".into(),
            branch: "refs/heads/main".into(),
            package_path_hint: String::new(),
        };
        assert!(validate_dispatch_request(&request).is_err());
    }
}
