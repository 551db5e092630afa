use std::str::FromStr;

use log::debug;

use crate::{
    context::AppContext,
    error::{Error, Result},
    guard::Route,
    models::{Certification, Education, Id, ProfileDetails},
};

use super::{notify_failure, Mount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileTab {
    #[default]
    Profile,
    Education,
    Certification,
}

impl FromStr for ProfileTab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "profile" => Ok(Self::Profile),
            "education" => Ok(Self::Education),
            "cert" => Ok(Self::Certification),
            other => Err(Error::Validation(format!("Unknown profile tab `{}`", other))),
        }
    }
}

/// Editor for the signed-in user's own profile
#[derive(Debug)]
pub struct EditProfile {
    ctx: AppContext,
    mount: Mount,
    user_id: Id,
    tab: ProfileTab,
    profile: ProfileDetails,
    education: Education,
    certification: Certification,
    loading: bool,
    saving: bool,
}

impl EditProfile {
    /// `tab` is the raw `?tab=` value; anything unknown opens the profile tab
    pub fn new(ctx: AppContext, tab: Option<&str>) -> Result<Self> {
        let user = ctx
            .session
            .current_user()
            .ok_or_else(|| Error::Validation("Sign in to edit your profile".to_string()))?;
        let tab = tab.and_then(|t| t.parse().ok()).unwrap_or_default();
        Ok(Self {
            ctx,
            mount: Mount::new(),
            user_id: user.user_id,
            tab,
            profile: ProfileDetails::default(),
            education: Education::default(),
            certification: Certification::default(),
            loading: true,
            saving: false,
        })
    }

    pub fn tab(&self) -> ProfileTab {
        self.tab
    }
    pub fn set_tab(&mut self, tab: ProfileTab) {
        self.tab = tab;
    }
    pub fn is_loading(&self) -> bool {
        self.loading
    }
    pub fn is_saving(&self) -> bool {
        self.saving
    }
    pub fn profile(&self) -> &ProfileDetails {
        &self.profile
    }
    pub fn profile_mut(&mut self) -> &mut ProfileDetails {
        &mut self.profile
    }
    pub fn education(&self) -> &Education {
        &self.education
    }
    pub fn education_mut(&mut self) -> &mut Education {
        &mut self.education
    }
    pub fn certification(&self) -> &Certification {
        &self.certification
    }
    pub fn certification_mut(&mut self) -> &mut Certification {
        &mut self.certification
    }
    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    /// Fills the forms from the backend. A failed fetch leaves them empty.
    pub async fn load(&mut self) {
        let result = self.mount.run(self.ctx.api.user(self.user_id)).await;
        match result {
            Ok(profile) => {
                self.profile = profile.details;
                if let Some(education) = profile.education {
                    self.education = education;
                }
            }
            Err(Error::Cancelled) => return,
            Err(e) => debug!("Could not load profile {}: {}", self.user_id, e),
        }
        self.loading = false;
    }

    /// Saves the profile form and returns where to go next
    pub async fn save_profile(&mut self) -> Result<Route> {
        self.saving = true;
        let result = self
            .mount
            .run(self.ctx.api.update_profile(&self.profile))
            .await;
        self.saving = false;
        notify_failure(&self.ctx.notifier, result, "Failed to update")?;
        self.ctx.notifier.success("Profile updated!");
        Ok(Route::Profile(self.user_id))
    }

    pub async fn save_education(&mut self) -> Result<()> {
        self.saving = true;
        let result = self
            .mount
            .run(self.ctx.api.update_education(&self.education))
            .await;
        self.saving = false;
        notify_failure(&self.ctx.notifier, result, "Failed to update education")?;
        self.ctx.notifier.success("Education updated!");
        Ok(())
    }

    /// Sends the certification form and clears it on success
    pub async fn add_certification(&mut self) -> Result<()> {
        if self.certification.certification_name.trim().is_empty() {
            const REQUIRED: &str = "Certification name required";
            self.ctx.notifier.error(REQUIRED);
            return Err(Error::Validation(REQUIRED.to_string()));
        }

        self.saving = true;
        let result = self
            .mount
            .run(self.ctx.api.add_certification(&self.certification))
            .await;
        self.saving = false;
        notify_failure(&self.ctx.notifier, result, "Failed to add cert")?;
        self.ctx.notifier.success("Certification added!");
        self.certification = Certification::default();
        Ok(())
    }
}
