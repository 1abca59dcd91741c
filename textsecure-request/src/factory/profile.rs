//! Profiles and usernames.

use http::Method;
use serde::Serialize;
use textsecure_request_core::encoding::{encode_base64, serialize_base64, serialize_base64_opt};
use textsecure_request_core::{
    ConstructionError, RequestDescriptor, ServiceAddress, UdAccessKey, require_non_empty,
    require_path_segment,
};
use url::form_urlencoded;

use super::{DescriptorBuilderExt, RequestFactory};

const PROFILE: &str = "/v1/profile";

#[derive(Serialize)]
struct VersionedProfileBody<'a> {
    #[serde(
        serialize_with = "serialize_base64_opt",
        skip_serializing_if = "Option::is_none"
    )]
    name: Option<Vec<u8>>,
    avatar: bool,
    version: &'a str,
    #[serde(serialize_with = "serialize_base64")]
    commitment: &'a [u8],
}

impl RequestFactory {
    /// Fetch a profile without profile-key credentials.
    pub fn get_unversioned_profile(
        address: &ServiceAddress,
        ud_access_key: Option<&UdAccessKey>,
    ) -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, format!("{PROFILE}/{address}"))
            .sealed_sender(ud_access_key)?
            .build())
    }

    /// Fetch a profile at a given profile-key version.
    ///
    /// `credential_request` asks the service to issue a profile-key credential
    /// alongside the profile. It is hex-encoded into the path and is only
    /// meaningful together with a version.
    pub fn get_versioned_profile(
        address: &ServiceAddress,
        profile_key_version: Option<&str>,
        credential_request: Option<&[u8]>,
        ud_access_key: Option<&UdAccessKey>,
    ) -> Result<RequestDescriptor, ConstructionError> {
        let path = match (profile_key_version, credential_request) {
            (None, None) => format!("{PROFILE}/{address}"),
            (None, Some(_)) => {
                return Err(ConstructionError::conflict(
                    "credential request",
                    "requires a profile key version",
                ));
            }
            (Some(version), None) => {
                require_path_segment("profile key version", version)?;
                format!("{PROFILE}/{address}/{version}")
            }
            (Some(version), Some(request)) => {
                require_path_segment("profile key version", version)?;
                require_non_empty("credential request", request)?;
                format!("{PROFILE}/{address}/{version}/{}", hex::encode(request))
            }
        };
        Ok(RequestDescriptor::builder(Method::GET, path)
            .sealed_sender(ud_access_key)?
            .build())
    }

    /// Publish a new versioned profile.
    ///
    /// `name` is the encrypted, padded profile name; `commitment` is the
    /// profile-key commitment for `version`.
    pub fn versioned_profile_set(
        name: Option<&[u8]>,
        has_avatar: bool,
        version: &str,
        commitment: &[u8],
    ) -> Result<RequestDescriptor, ConstructionError> {
        if let Some(name) = name {
            require_non_empty("profile name", name)?;
        }
        require_non_empty("profile version", version)?;
        require_non_empty("profile commitment", commitment)?;
        Ok(RequestDescriptor::builder(Method::PUT, format!("{PROFILE}/"))
            .json_body(&VersionedProfileBody {
                name: name.map(<[u8]>::to_vec),
                avatar: has_avatar,
                version,
                commitment,
            })?
            .build())
    }

    /// Set the unversioned encrypted profile name; `None` clears it.
    pub fn profile_name_set(
        encrypted_padded_name: Option<&[u8]>,
    ) -> Result<RequestDescriptor, ConstructionError> {
        let path = match encrypted_padded_name {
            Some(name) => {
                require_non_empty("profile name", name)?;
                let encoded: String =
                    form_urlencoded::byte_serialize(encode_base64(name).as_bytes()).collect();
                format!("{PROFILE}/name/{encoded}")
            }
            None => format!("{PROFILE}/name"),
        };
        Ok(RequestDescriptor::builder(Method::PUT, path).build())
    }

    pub fn profile_avatar_upload_form() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::GET, format!("{PROFILE}/form/avatar")).build())
    }

    // Usernames

    /// Reserve `username` for the local account.
    pub fn username_set(username: &str) -> Result<RequestDescriptor, ConstructionError> {
        require_path_segment("username", username)?;
        Ok(
            RequestDescriptor::builder(Method::PUT, format!("/v1/accounts/username/{username}"))
                .build(),
        )
    }

    pub fn username_delete() -> Result<RequestDescriptor, ConstructionError> {
        Ok(RequestDescriptor::builder(Method::DELETE, "/v1/accounts/username").build())
    }

    pub fn get_profile_by_username(username: &str) -> Result<RequestDescriptor, ConstructionError> {
        require_path_segment("username", username)?;
        Ok(
            RequestDescriptor::builder(Method::GET, format!("{PROFILE}/username/{username}"))
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::UNIDENTIFIED_ACCESS_KEY_HEADER;
    use serde_json::{Value, json};

    fn address() -> ServiceAddress {
        ServiceAddress::new("UUID-1234").unwrap()
    }

    #[test]
    fn test_unversioned_profile_session() {
        let d = RequestFactory::get_unversioned_profile(&address(), None).unwrap();
        assert_eq!((d.method(), d.path()), (&Method::GET, "/v1/profile/UUID-1234"));
        assert!(d.uses_session_auth());
        assert!(d.headers().get(UNIDENTIFIED_ACCESS_KEY_HEADER).is_none());
    }

    #[test]
    fn test_unversioned_profile_sealed_sender() {
        let key = UdAccessKey::new(&[3u8; 16]).unwrap();
        let d = RequestFactory::get_unversioned_profile(&address(), Some(&key)).unwrap();
        assert_eq!(d.path(), "/v1/profile/UUID-1234");
        assert!(d.requires_unauthenticated());
        assert!(d.headers().get(UNIDENTIFIED_ACCESS_KEY_HEADER).is_some());
    }

    #[test]
    fn test_versioned_profile_paths() {
        let d = RequestFactory::get_versioned_profile(&address(), None, None, None).unwrap();
        assert_eq!(d.path(), "/v1/profile/UUID-1234");

        let d = RequestFactory::get_versioned_profile(&address(), Some("v1abc"), None, None)
            .unwrap();
        assert_eq!(d.path(), "/v1/profile/UUID-1234/v1abc");

        let d = RequestFactory::get_versioned_profile(
            &address(),
            Some("v1abc"),
            Some(&[0xde, 0xad, 0xbe, 0xef]),
            None,
        )
        .unwrap();
        assert_eq!(d.path(), "/v1/profile/UUID-1234/v1abc/deadbeef");
        assert!(d.uses_session_auth());
    }

    #[test]
    fn test_versioned_profile_sealed_sender() {
        let key = UdAccessKey::new(&[3u8; 16]).unwrap();
        let d = RequestFactory::get_versioned_profile(&address(), Some("v"), None, Some(&key))
            .unwrap();
        assert!(d.requires_unauthenticated());
        assert!(d.headers().contains_key(UNIDENTIFIED_ACCESS_KEY_HEADER));
    }

    #[test]
    fn test_versioned_profile_conflicts() {
        assert!(matches!(
            RequestFactory::get_versioned_profile(&address(), None, Some(&[1]), None),
            Err(ConstructionError::Conflict { field: "credential request", .. })
        ));
        assert_eq!(
            RequestFactory::get_versioned_profile(
                &address(),
                Some("v"),
                Some(b"".as_slice()),
                None
            ),
            Err(ConstructionError::empty("credential request"))
        );
        assert!(RequestFactory::get_versioned_profile(&address(), Some(""), None, None).is_err());
    }

    #[test]
    fn test_versioned_profile_set() {
        let d = RequestFactory::versioned_profile_set(Some(b"name"), true, "v2", &[1, 2, 3])
            .unwrap();
        assert_eq!((d.method(), d.path()), (&Method::PUT, "/v1/profile/"));
        let body: Value = serde_json::from_slice(d.body().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({ "name": "bmFtZQ==", "avatar": true, "version": "v2", "commitment": "AQID" })
        );

        let d = RequestFactory::versioned_profile_set(None, false, "v2", &[1]).unwrap();
        let body: Value = serde_json::from_slice(d.body().unwrap()).unwrap();
        assert!(body.get("name").is_none());
        assert_eq!(body["avatar"], false);
    }

    #[test]
    fn test_versioned_profile_set_validation() {
        assert_eq!(
            RequestFactory::versioned_profile_set(None, false, "", &[1]),
            Err(ConstructionError::empty("profile version"))
        );
        assert_eq!(
            RequestFactory::versioned_profile_set(None, false, "v", &[]),
            Err(ConstructionError::empty("profile commitment"))
        );
    }

    #[test]
    fn test_profile_name_set() {
        // base64 of [0xfb, 0xff] is "+/8=", every character needs escaping
        let d = RequestFactory::profile_name_set(Some(&[0xfb, 0xff])).unwrap();
        assert_eq!((d.method(), d.path()), (&Method::PUT, "/v1/profile/name/%2B%2F8%3D"));

        let d = RequestFactory::profile_name_set(None).unwrap();
        assert_eq!(d.path(), "/v1/profile/name");
    }

    #[test]
    fn test_profile_avatar_upload_form() {
        let d = RequestFactory::profile_avatar_upload_form().unwrap();
        assert_eq!((d.method(), d.path()), (&Method::GET, "/v1/profile/form/avatar"));
    }

    #[test]
    fn test_usernames() {
        let d = RequestFactory::username_set("alice").unwrap();
        assert_eq!((d.method(), d.path()), (&Method::PUT, "/v1/accounts/username/alice"));

        let d = RequestFactory::username_delete().unwrap();
        assert_eq!((d.method(), d.path()), (&Method::DELETE, "/v1/accounts/username"));

        let d = RequestFactory::get_profile_by_username("alice").unwrap();
        assert_eq!((d.method(), d.path()), (&Method::GET, "/v1/profile/username/alice"));
    }

    #[test]
    fn test_username_validation() {
        assert_eq!(
            RequestFactory::username_set(""),
            Err(ConstructionError::empty("username"))
        );
        assert!(RequestFactory::username_set("a/b").is_err());
        assert!(RequestFactory::get_profile_by_username("").is_err());
    }
}
