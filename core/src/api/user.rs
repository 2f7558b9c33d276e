//! `/api/user`: profile, login and the per-user activity log.

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::requester::{path_segment, with_query, Call, Requester};
use crate::validate;

const USER_ENDPOINT: &str = "/api/user";

#[derive(Debug, Clone, Copy)]
pub struct UserApi<'a> {
    requester: &'a Requester,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(requester: &'a Requester) -> Self {
        Self { requester }
    }

    pub async fn get_profile(&self, username: &str) -> Result<Value, ApiError> {
        self.requester.send(get_profile_call(username)?).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Value, ApiError> {
        self.requester.send(login_call(username, password)?).await
    }

    /// Read the activity log. `options` (e.g. `limit`) become the query string.
    pub async fn get_activity(
        &self,
        username: &str,
        options: &[(&str, &str)],
    ) -> Result<Value, ApiError> {
        self.requester.send(get_activity_call(username, options)?).await
    }

    pub async fn log_activity(
        &self,
        username: &str,
        activity_type: &str,
        description: &str,
    ) -> Result<Value, ApiError> {
        self.requester
            .send(log_activity_call(username, activity_type, description)?)
            .await
    }
}

fn activity_endpoint(username: &str) -> String {
    format!("{USER_ENDPOINT}/{}/activity", path_segment(username))
}

fn get_profile_call(username: &str) -> Result<Call, ApiError> {
    validate::non_empty("username", username)?;
    Ok(Call::get(with_query(USER_ENDPOINT, [("username", username)])))
}

fn login_call(username: &str, password: &str) -> Result<Call, ApiError> {
    validate::non_empty("username", username)?;
    validate::non_empty("password", password)?;
    Ok(Call::post_json(
        USER_ENDPOINT,
        &json!({ "username": username, "password": password }),
    ))
}

fn get_activity_call(username: &str, options: &[(&str, &str)]) -> Result<Call, ApiError> {
    validate::non_empty("username", username)?;
    validate::segment("username", username)?;
    Ok(Call::get(with_query(
        &activity_endpoint(username),
        options.iter().copied(),
    )))
}

fn log_activity_call(
    username: &str,
    activity_type: &str,
    description: &str,
) -> Result<Call, ApiError> {
    validate::non_empty("username", username)?;
    validate::segment("username", username)?;
    validate::non_empty("activityType", activity_type)?;
    validate::non_empty("description", description)?;
    Ok(Call::post_json(
        activity_endpoint(username),
        &json!({ "activity_type": activity_type, "description": description }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn profile_puts_username_in_query() {
        let call = get_profile_call("test").unwrap();
        assert_eq!(call.method, HttpMethod::Get);
        assert_eq!(call.endpoint, "/api/user?username=test");
    }

    #[test]
    fn profile_encodes_username() {
        let call = get_profile_call("a b&c").unwrap();
        assert_eq!(call.endpoint, "/api/user?username=a+b%26c");
    }

    #[test]
    fn login_posts_credentials() {
        let call = login_call("test", "password").unwrap();
        assert_eq!(call.method, HttpMethod::Post);
        assert_eq!(call.endpoint, "/api/user");
        assert_eq!(
            call.body.unwrap().as_json().unwrap(),
            r#"{"username":"test","password":"password"}"#
        );
    }

    #[test]
    fn login_requires_password() {
        assert!(login_call("test", "").unwrap_err().is_validation());
        assert!(login_call("", "password").unwrap_err().is_validation());
    }

    #[test]
    fn activity_read_with_limit() {
        let call = get_activity_call("alice", &[("limit", "10")]).unwrap();
        assert_eq!(call.endpoint, "/api/user/alice/activity?limit=10");
    }

    #[test]
    fn activity_read_without_options() {
        let call = get_activity_call("alice", &[]).unwrap();
        assert_eq!(call.endpoint, "/api/user/alice/activity");
    }

    #[test]
    fn activity_username_is_one_segment() {
        let call = get_activity_call("../admin", &[]).unwrap();
        assert_eq!(call.endpoint, "/api/user/..%2Fadmin/activity");
    }

    fn parsed_path(endpoint: &str) -> String {
        url::Url::parse(&format!("https://test.com{endpoint}"))
            .unwrap()
            .path()
            .to_string()
    }

    #[test]
    fn activity_username_survives_url_parsing() {
        for (username, expected) in [
            ("a\\b", "/api/user/a%5Cb/activity"),
            ("a/b", "/api/user/a%2Fb/activity"),
            ("...", "/api/user/.../activity"),
            ("a|b[0]", "/api/user/a%7Cb%5B0%5D/activity"),
        ] {
            let read = get_activity_call(username, &[]).unwrap();
            assert_eq!(parsed_path(&read.endpoint), expected, "{username}");
            let write = log_activity_call(username, "login", "x").unwrap();
            assert_eq!(parsed_path(&write.endpoint), expected, "{username}");
        }
    }

    #[test]
    fn activity_rejects_dot_segment_usernames() {
        for username in [".", ".."] {
            assert!(get_activity_call(username, &[]).unwrap_err().is_validation());
            assert!(log_activity_call(username, "login", "x").unwrap_err().is_validation());
        }
    }

    #[test]
    fn activity_write_uses_snake_case_type() {
        let call = log_activity_call("alice", "login", "Signed in").unwrap();
        assert_eq!(call.method, HttpMethod::Post);
        assert_eq!(call.endpoint, "/api/user/alice/activity");
        assert_eq!(
            call.body.unwrap().as_json().unwrap(),
            r#"{"activity_type":"login","description":"Signed in"}"#
        );
    }

    #[test]
    fn activity_write_validates_every_argument() {
        assert!(log_activity_call("", "login", "x").is_err());
        assert!(log_activity_call("alice", "", "x").is_err());
        assert!(log_activity_call("alice", "login", "").is_err());
    }
}
