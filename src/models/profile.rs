use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DisplayFromStr, PickFirst};

use super::Id;

/// `GET /users/{id}`
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub user_id: Id,
    pub username: String,
    #[serde(flatten)]
    pub details: ProfileDetails,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub education: Option<Education>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

/// The editable part of a profile, sent as-is to `/users/profile/update`
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ProfileDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub core_level: Option<CoreLevel>,
    pub knowledge_today: Option<String>,
    pub phone_no: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub age: Option<u32>,
    pub photo: Option<String>,
}

#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Education {
    pub university_name: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub cgpa: Option<f64>,
    pub virtual_course: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub virtual_gpa: Option<f64>,
    pub hsc_name: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub hsc_marks: Option<f64>,
    pub ssc_name: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub ssc_marks: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Certification {
    pub certification_name: String,
    pub certificate_url: Option<String>,
    pub certificate_img: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, ValueEnum, PartialEq, Eq)]
pub enum CoreLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl fmt::Display for CoreLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "Beginner"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::Advanced => write!(f, "Advanced"),
            Self::Expert => write!(f, "Expert"),
        }
    }
}
