use crate::error::{ClientError, ClientResult};
use crate::models::{
    BuyerRegistration, Credentials, DeliveryPreferences, FarmerRegistration,
};

fn any_blank(fields: &[&String]) -> bool {
    fields.iter().any(|field| field.trim().is_empty())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> ClientResult<Credentials> {
        if any_blank(&[&self.email, &self.password]) {
            return Err(ClientError::Validation(
                "Email and Password are required.".to_string(),
            ));
        }

        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuyerRegistrationForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// `"true"` (any case) enables contactless delivery; anything else disables it.
    pub contactless: String,
    pub preferred_time: String,
}

impl BuyerRegistrationForm {
    pub fn validate(&self) -> ClientResult<BuyerRegistration> {
        if any_blank(&[
            &self.email,
            &self.password,
            &self.first_name,
            &self.last_name,
            &self.contactless,
            &self.preferred_time,
        ]) {
            return Err(ClientError::Validation("All fields are required.".to_string()));
        }

        Ok(BuyerRegistration {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            delivery_preferences: DeliveryPreferences {
                contactless: self.contactless.trim().eq_ignore_ascii_case("true"),
                preferred_time: self.preferred_time.trim().to_string(),
            },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmerRegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub farm_name: String,
    pub farm_size: String,
    pub location: String,
    pub password: String,
    pub confirm_password: String,
}

impl FarmerRegistrationForm {
    pub fn validate(&self) -> ClientResult<FarmerRegistration> {
        if any_blank(&[
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.farm_name,
            &self.farm_size,
            &self.location,
            &self.password,
            &self.confirm_password,
        ]) {
            return Err(ClientError::Validation("Please fill in all fields.".to_string()));
        }

        if self.password != self.confirm_password {
            return Err(ClientError::Validation("Passwords do not match.".to_string()));
        }

        Ok(FarmerRegistration {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            farm_name: self.farm_name.trim().to_string(),
            farm_size: self.farm_size.trim().to_string(),
            location: self.location.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farmer_form() -> FarmerRegistrationForm {
        FarmerRegistrationForm {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            email: " ana@example.com ".to_string(),
            farm_name: "Green Acres".to_string(),
            farm_size: "50 acres".to_string(),
            location: "Fresno".to_string(),
            password: "hunter2".to_string(),
            confirm_password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_login_form() {
        let credentials = LoginForm {
            email: " ana@example.com".to_string(),
            password: " pw ".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(credentials.email, "ana@example.com");
        // Passwords are sent exactly as typed.
        assert_eq!(credentials.password, " pw ");

        assert!(LoginForm::default().validate().is_err());
    }

    #[test]
    fn test_buyer_contactless_parsing() {
        let mut form = BuyerRegistrationForm {
            email: "b@example.com".to_string(),
            password: "pw".to_string(),
            first_name: "Bo".to_string(),
            last_name: "Lee".to_string(),
            contactless: "TRUE".to_string(),
            preferred_time: "morning".to_string(),
        };
        assert!(form.validate().unwrap().delivery_preferences.contactless);

        form.contactless = "yes".to_string();
        assert!(!form.validate().unwrap().delivery_preferences.contactless);

        form.preferred_time = String::new();
        assert_eq!(
            form.validate().unwrap_err().user_message(),
            "All fields are required."
        );
    }

    #[test]
    fn test_farmer_registration() {
        let registration = farmer_form().validate().unwrap();
        assert_eq!(registration.email, "ana@example.com");

        let mut mismatch = farmer_form();
        mismatch.confirm_password = "hunter3".to_string();
        assert_eq!(
            mismatch.validate().unwrap_err().user_message(),
            "Passwords do not match."
        );

        let mut blank = farmer_form();
        blank.location = " ".to_string();
        assert_eq!(
            blank.validate().unwrap_err().user_message(),
            "Please fill in all fields."
        );
    }
}
