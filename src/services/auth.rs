use tracing::{info, warn};

use crate::client::{ApiClient, HttpMethod};
use crate::error::{ClientError, ClientResult};
use crate::forms::LoginForm;
use crate::models::{ActionResponse, AuthenticatedUser, LoginResponse, UserRole};
use crate::models::responses::non_empty_or;

const LOGGED_OUT: &str = "Logged out successfully.";

/// Login and logout for both user types. The outcome is recorded in the
/// client's [`Session`](crate::client::Session).
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        AuthService { api }
    }

    pub async fn login(&self, role: UserRole, form: &LoginForm) -> ClientResult<AuthenticatedUser> {
        let credentials = form.validate()?;

        let response: LoginResponse = self
            .api
            .send_json(role.login_endpoint(), HttpMethod::Post, &credentials)
            .await?;

        if !response.is_success() {
            warn!("{} login rejected for {}", role, credentials.email);
            return Err(ClientError::Application(non_empty_or(
                response.message,
                "Failed to log in.",
            )));
        }

        let mut user = response.user.unwrap_or_else(|| AuthenticatedUser {
            id: None,
            email: credentials.email.clone(),
            first_name: None,
            last_name: None,
            user_type: None,
            farm_name: None,
            farm_size: None,
            location: None,
        });
        user.user_type.get_or_insert(role);

        self.api.session().sign_in(role, user.clone());
        info!("Logged in as {} {}", role, user.email);

        Ok(user)
    }

    /// Ends the session. Farmers log out through `/farmer/logout`; buyers
    /// (and an empty session) are only cleared locally.
    pub async fn logout(&self) -> ClientResult<String> {
        let Some(role) = self.api.session().role() else {
            self.api.session().clear();
            return Ok(LOGGED_OUT.to_string());
        };

        let Some(endpoint) = role.logout_endpoint() else {
            self.api.session().clear();
            info!("Logged out {}", role);
            return Ok(LOGGED_OUT.to_string());
        };

        let response: ActionResponse = self.api.send_empty(endpoint, HttpMethod::Post).await?;

        if response.success == Some(false) {
            return Err(ClientError::Application(non_empty_or(
                response.message,
                "Failed to log out.",
            )));
        }

        self.api.session().clear();
        info!("Logged out {}", role);

        Ok(non_empty_or(response.message, LOGGED_OUT))
    }
}
