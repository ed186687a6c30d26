use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型，本服务只接受 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

pub struct JwtUtils;

impl JwtUtils {
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    /// 使用全局配置的密钥签发 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
        expiry_minutes: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::encode_with_secret(
            &Self::get_secret(),
            user_id,
            role,
            ACCESS_TOKEN_TYPE,
            chrono::Duration::minutes(expiry_minutes),
        )
    }

    pub(crate) fn encode_with_secret(
        secret: &str,
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    pub(crate) fn decode_with_secret(
        secret: &str,
        token: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        decode::<Claims>(token, &decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
    }

    pub(crate) fn verify_access_with_secret(
        secret: &str,
        token: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = Self::decode_with_secret(secret, token)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    // 验证 Access Token（签名、过期时间与类型）
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_access_with_secret(&Self::get_secret(), token)
    }

    pub fn decode_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(&Self::get_secret(), token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_access_token_verifies() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            42,
            "teacher",
            "access",
            chrono::Duration::minutes(5),
        )
        .unwrap();

        let claims = JwtUtils::verify_access_with_secret(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "teacher");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_rejects_wrong_type_secret_and_expired() {
        let refresh = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "student",
            "refresh",
            chrono::Duration::minutes(5),
        )
        .unwrap();
        assert!(JwtUtils::verify_access_with_secret(SECRET, &refresh).is_err());

        let token = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "student",
            "access",
            chrono::Duration::minutes(5),
        )
        .unwrap();
        assert!(JwtUtils::verify_access_with_secret("other-secret", &token).is_err());

        // 超出默认 60 秒容差
        let expired = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "student",
            "access",
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::verify_access_with_secret(SECRET, &expired).is_err());
    }
}
