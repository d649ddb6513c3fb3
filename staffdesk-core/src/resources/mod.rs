//! Resource definitions
//!
//! One [`EntityResource`](crate::traits::EntityResource) per backend collection.

mod account;
mod hospital;
mod membership;
mod professional;
mod profile;

pub use account::{
    Account, AccountForm, AccountResource, AccountRole, CreateAccountRequest,
    UpdateAccountRequest,
};
pub use hospital::{Hospital, HospitalForm, HospitalRequest, HospitalResource};
pub use membership::{
    CreateMembershipRequest, Membership, MembershipForm, MembershipInviteHook,
    MembershipResource, MembershipRole, MembershipStatus, UpdateMembershipRequest,
};
pub use professional::{Professional, ProfessionalForm, ProfessionalRequest, ProfessionalResource};
pub use profile::{Profile, ProfileForm, ProfileRequest, ProfileResource};
