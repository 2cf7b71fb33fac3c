//! Raw Imgur API records and the normalized profile built from them.

// crates.io
use serde::{Deserializer, Serializer, de::Error as _};
use serde_json::Value;
// self
use crate::{_prelude::*, profile::PROVIDER_NAME};

/// Marker that always serializes as `"imgur"` and refuses any other value on the way back in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProviderTag;
impl ProviderTag {
	/// Provider literal.
	pub const fn as_str(self) -> &'static str {
		PROVIDER_NAME
	}
}
impl Display for ProviderTag {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(PROVIDER_NAME)
	}
}
impl Serialize for ProviderTag {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(PROVIDER_NAME)
	}
}
impl<'de> Deserialize<'de> for ProviderTag {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;

		if value == PROVIDER_NAME {
			Ok(Self)
		} else {
			Err(D::Error::invalid_value(serde::de::Unexpected::Str(&value), &PROVIDER_NAME))
		}
	}
}

/// A profile field copied as decoded: the expected type when it matches, otherwise the raw JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
	/// Value of the expected type.
	Known(T),
	/// Any other JSON value, kept verbatim.
	Other(Value),
}
impl<T> Lenient<T> {
	/// Returns the typed value, if the field had the expected type.
	pub fn known(&self) -> Option<&T> {
		match self {
			Lenient::Known(value) => Some(value),
			Lenient::Other(_) => None,
		}
	}

	/// Consumes the field, returning the typed value, if any.
	pub fn into_known(self) -> Option<T> {
		match self {
			Lenient::Known(value) => Some(value),
			Lenient::Other(_) => None,
		}
	}

	/// Returns the raw JSON kept for a field of an unexpected type.
	pub fn other(&self) -> Option<&Value> {
		match self {
			Lenient::Known(_) => None,
			Lenient::Other(value) => Some(value),
		}
	}
}
impl Lenient<String> {
	/// Borrows a string field.
	pub fn as_str(&self) -> Option<&str> {
		self.known().map(String::as_str)
	}
}
impl<T> From<T> for Lenient<T> {
	fn from(value: T) -> Self {
		Lenient::Known(value)
	}
}

/// Imgur account identifier; the API has returned both numeric and string forms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountId {
	/// Numeric identifier.
	Numeric(u64),
	/// String identifier.
	Text(String),
	/// Any other JSON value, kept verbatim.
	Other(Value),
}
impl Display for AccountId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			AccountId::Numeric(id) => write!(f, "{id}"),
			AccountId::Text(id) => f.write_str(id),
			AccountId::Other(value) => write!(f, "{value}"),
		}
	}
}

/// Pro-membership expiration: `false` when the account is not pro, otherwise an epoch timestamp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProExpiration {
	/// Boolean flag form.
	Flag(bool),
	/// Unix timestamp in seconds.
	Timestamp(i64),
	/// Any other JSON value, kept verbatim.
	Other(Value),
}
impl ProExpiration {
	/// Expiration instant, when the value carries a valid timestamp.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		match self {
			ProExpiration::Timestamp(ts) => OffsetDateTime::from_unix_timestamp(*ts).ok(),
			ProExpiration::Flag(_) | ProExpiration::Other(_) => None,
		}
	}
}

/// `data` object of `GET account/me/`.
///
/// Fields of an unexpected JSON type are kept as raw values instead of failing the decode.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AccountRecord {
	/// Account identifier.
	pub id: Option<AccountId>,
	/// Account username.
	pub url: Option<Lenient<String>>,
	/// Free-form biography.
	pub bio: Option<Lenient<String>>,
	/// Reputation score.
	pub reputation: Option<Lenient<f64>>,
	/// Pro-membership expiration.
	pub pro_expiration: Option<ProExpiration>,
	/// Account creation time (Unix seconds).
	pub created: Option<Lenient<i64>>,
}

/// `data` object of `GET account/me/settings`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SettingsRecord {
	/// Primary e-mail address.
	pub email: Option<Lenient<String>>,
	/// Whether high-quality uploads are enabled.
	pub high_quality: Option<Lenient<bool>>,
	/// Whether images are public by default.
	pub public_images: Option<Lenient<bool>>,
	/// Default album privacy.
	pub album_privacy: Option<Lenient<String>>,
	/// Pro-membership expiration.
	pub pro_expiration: Option<ProExpiration>,
	/// Whether the user accepted the gallery terms.
	pub accepted_gallery_terms: Option<Lenient<bool>>,
	/// Active e-mail addresses.
	pub active_emails: Option<Lenient<Vec<String>>>,
	/// Whether private messaging is enabled.
	pub messaging_enabled: Option<Lenient<bool>>,
	/// Blocked users.
	pub blocked_users: Option<Lenient<Vec<Value>>>,
	/// Whether mature content is shown.
	pub show_mature: Option<Lenient<bool>>,
}

/// Top-level `{ "data": ... }` wrapper used by every Imgur v3 response.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
	/// Response payload.
	pub data: T,
}

/// Provider-agnostic user profile handed to verify callbacks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProfile {
	/// Always `"imgur"`.
	pub provider: ProviderTag,
	/// Account identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<AccountId>,
	/// Account username.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<Lenient<String>>,
	/// Free-form biography.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bio: Option<Lenient<String>>,
	/// Reputation score.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reputation: Option<Lenient<f64>>,
	/// Pro-membership expiration; the settings value replaces the account value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pro_expiration: Option<ProExpiration>,
	/// Account creation time (Unix seconds).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created: Option<Lenient<i64>>,
	/// Primary e-mail address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<Lenient<String>>,
	/// Whether high-quality uploads are enabled.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub high_quality: Option<Lenient<bool>>,
	/// Whether images are public by default.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub public_images: Option<Lenient<bool>>,
	/// Default album privacy.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub album_privacy: Option<Lenient<String>>,
	/// Whether the user accepted the gallery terms.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub accepted_gallery_terms: Option<Lenient<bool>>,
	/// Active e-mail addresses.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub active_emails: Option<Lenient<Vec<String>>>,
	/// Whether private messaging is enabled.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub messaging_enabled: Option<Lenient<bool>>,
	/// Blocked users.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub blocked_users: Option<Lenient<Vec<Value>>>,
	/// Whether mature content is shown.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub show_mature: Option<Lenient<bool>>,
}
impl NormalizedProfile {
	/// Starts a profile from the account-info record.
	pub fn from_account(account: AccountRecord) -> Self {
		Self {
			id: account.id,
			url: account.url,
			bio: account.bio,
			reputation: account.reputation,
			pro_expiration: account.pro_expiration,
			created: account.created,
			..Default::default()
		}
	}

	/// Folds the settings record in. `pro_expiration` is always taken from settings.
	pub fn merge_settings(mut self, settings: SettingsRecord) -> Self {
		self.email = settings.email;
		self.high_quality = settings.high_quality;
		self.public_images = settings.public_images;
		self.album_privacy = settings.album_privacy;
		self.pro_expiration = settings.pro_expiration;
		self.accepted_gallery_terms = settings.accepted_gallery_terms;
		self.active_emails = settings.active_emails;
		self.messaging_enabled = settings.messaging_enabled;
		self.blocked_users = settings.blocked_users;
		self.show_mature = settings.show_mature;

		self
	}

	/// Provider literal.
	pub fn provider(&self) -> &'static str {
		self.provider.as_str()
	}

	/// Account username, when it was a string.
	pub fn username(&self) -> Option<&str> {
		self.url.as_ref().and_then(Lenient::as_str)
	}

	/// Primary e-mail address, when it was a string.
	pub fn email_address(&self) -> Option<&str> {
		self.email.as_ref().and_then(Lenient::as_str)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn account_ids_keep_their_decoded_form() {
		let text: AccountRecord =
			serde_json::from_value(json!({ "id": "123" })).expect("String id should decode.");
		let numeric: AccountRecord =
			serde_json::from_value(json!({ "id": 384077 })).expect("Numeric id should decode.");

		assert_eq!(text.id, Some(AccountId::Text("123".into())));
		assert_eq!(numeric.id, Some(AccountId::Numeric(384_077)));
		assert_eq!(numeric.id.map(|id| id.to_string()).as_deref(), Some("384077"));
	}

	#[test]
	fn pro_expiration_accepts_flag_and_timestamp() {
		let flag: ProExpiration = serde_json::from_value(json!(false)).expect("Flag should decode.");
		let ts: ProExpiration =
			serde_json::from_value(json!(1_700_000_000)).expect("Timestamp should decode.");

		assert_eq!(flag, ProExpiration::Flag(false));
		assert!(flag.expires_at().is_none());
		assert!(ProExpiration::Other(json!("soon")).expires_at().is_none());
		assert_eq!(
			ts.expires_at().map(OffsetDateTime::unix_timestamp),
			Some(1_700_000_000)
		);
	}

	#[test]
	fn records_ignore_unknown_fields_and_nulls() {
		let record: AccountRecord = serde_json::from_value(json!({
			"id": 1,
			"bio": null,
			"avatar": "https://i.imgur.com/avatar.png",
		}))
		.expect("Unknown fields should be ignored.");

		assert_eq!(record.bio, None);
		assert_eq!(record.url, None);
	}

	#[test]
	fn mistyped_fields_are_kept_as_raw_json() {
		let account: AccountRecord = serde_json::from_value(json!({
			"id": -5,
			"url": "jdoe",
			"bio": 12345,
			"reputation": 10,
			"created": 1000.0,
		}))
		.expect("Mistyped account fields should still decode.");
		let settings: SettingsRecord = serde_json::from_value(json!({
			"active_emails": [null],
			"blocked_users": {},
			"show_mature": "yes",
		}))
		.expect("Mistyped settings fields should still decode.");

		assert_eq!(account.id, Some(AccountId::Other(json!(-5))));
		assert_eq!(account.url, Some(Lenient::Known("jdoe".into())));
		assert_eq!(account.bio, Some(Lenient::Other(json!(12345))));
		assert_eq!(account.reputation, Some(Lenient::Known(10.0)));
		assert_eq!(account.created.as_ref().and_then(Lenient::other), Some(&json!(1000.0)));
		assert_eq!(settings.active_emails, Some(Lenient::Other(json!([null]))));
		assert_eq!(settings.blocked_users, Some(Lenient::Other(json!({}))));
		assert_eq!(settings.show_mature.and_then(Lenient::into_known), None);
	}

	#[test]
	fn raw_fields_serialize_unchanged() {
		let profile = NormalizedProfile::from_account(AccountRecord {
			bio: Some(Lenient::Other(json!(12345))),
			created: Some(Lenient::Known(1000)),
			..Default::default()
		});
		let value = serde_json::to_value(&profile).expect("Profile should serialize.");

		assert_eq!(value, json!({ "provider": "imgur", "bio": 12345, "created": 1000 }));
	}

	#[test]
	fn settings_pro_expiration_replaces_account_value() {
		let account = AccountRecord {
			pro_expiration: Some(ProExpiration::Flag(false)),
			..Default::default()
		};
		let profile = NormalizedProfile::from_account(account.clone())
			.merge_settings(SettingsRecord {
				pro_expiration: Some(ProExpiration::Flag(true)),
				..Default::default()
			});

		assert_eq!(profile.pro_expiration, Some(ProExpiration::Flag(true)));

		let profile =
			NormalizedProfile::from_account(account).merge_settings(SettingsRecord::default());

		assert_eq!(profile.pro_expiration, None);
	}

	#[test]
	fn provider_tag_is_fixed() {
		let profile = NormalizedProfile::default();
		let value = serde_json::to_value(&profile).expect("Profile should serialize.");

		assert_eq!(value, json!({ "provider": "imgur" }));
		assert_eq!(profile.provider(), "imgur");
		assert!(
			serde_json::from_value::<NormalizedProfile>(json!({ "provider": "github" })).is_err()
		);
	}
}
