use super::id_attribute;
use crate::bridge;
use crate::buddy::models::Profile;
use crate::buddy::BuddyApi;
use crate::entities::profile::ProfileFields;
use crate::entities::Fields;
use crate::errors::ApiResultExt;
use crate::framework::{
    AttrPath, Diagnostics, ObjectBuilder, ObjectReader, ReadSpec, Record, Schema, StateValue, Value,
};
use async_trait::async_trait;

/// `buddy_profile`: the member the token belongs to
pub struct ProfileDataSource;

#[derive(Debug, Clone, Default)]
pub struct ProfileModel {
    pub id: Value<String>,
    pub profile: ProfileFields,
}

impl Record for ProfileModel {
    fn from_state(value: &StateValue, path: &AttrPath) -> Result<Self, Diagnostics> {
        let mut r = ObjectReader::new(value, path)?;
        let model = Self {
            id: r.string("id"),
            profile: ProfileFields::read(&mut r),
        };
        r.finish(model)
    }

    fn to_state(&self, path: &AttrPath) -> Result<StateValue, Diagnostics> {
        self.profile
            .write(ObjectBuilder::new(path).string("id", &self.id))
            .finish()
    }
}

#[async_trait]
impl ReadSpec for ProfileDataSource {
    type Model = ProfileModel;
    type Dto = Profile;

    const TYPE_NAME: &'static str = "buddy_profile";

    fn schema() -> Schema {
        Schema::new("Get the profile of the authenticated member")
            .attrs(ProfileFields::attributes())
            .attr("id", id_attribute())
    }

    async fn fetch(api: &dyn BuddyApi, _model: &ProfileModel, diags: &mut Diagnostics) -> Option<Profile> {
        diags.capture(api.get_profile().await.or_diagnostic("profile", "get profile"))
    }

    fn map(mut model: ProfileModel, dto: Profile, _diags: &mut Diagnostics) -> ProfileModel {
        model.id = bridge::string(&dto.id.to_string());
        model.profile = ProfileFields::load(&dto);
        model
    }
}
