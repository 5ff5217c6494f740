use std::sync::Arc;
use crate::domain::{
    models::{
        auth::{Claims, Identity, RefreshTokenRecord, TokenPair},
        user::{User, UserRole, UserStatus},
    },
    ports::{AuthRepository, UserRepository},
};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use sha2::{Sha256, Digest};
use tracing::{info, warn};

pub const TOKEN_AUDIENCE: &str = "donatrust-frontend";

pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub role: UserRole,
}

pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    users: Arc<dyn UserRepository>,
    config: Config,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::Internal)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|_| AppError::Internal)?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, users: Arc<dyn UserRepository>, config: Config) -> Self {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .expect("Invalid JWT Private Key PEM");
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .expect("Invalid JWT Public Key PEM");

        Self { repo, users, config, encoding_key, decoding_key }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<User, AppError> {
        if input.role == UserRole::Admin {
            return Err(AppError::Forbidden("Admin accounts cannot be self-registered".into()));
        }

        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".into()));
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(input.full_name.trim().to_string(), email, input.phone, password_hash, input.role);
        let created = self.users.create(&user).await?;

        info!("User registered: {} ({})", created.id, created.role);
        Ok(created)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AppError> {
        let user = self.users.find_by_email(&normalize_email(email)).await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            warn!("Failed login attempt for user {}", user.id);
            return Err(AppError::Unauthorized);
        }

        ensure_can_sign_in(&user)?;

        let family_id = Uuid::new_v4();
        let pair = self.issue_token_pair(&user, family_id, 1).await?;
        Ok((user, pair))
    }

    pub async fn refresh(&self, raw_refresh_token: &str) -> Result<TokenPair, AppError> {
        let token_hash = self.hash_token(raw_refresh_token);

        let record = self.repo.find_refresh_token(&token_hash).await?
            .ok_or(AppError::Unauthorized)?;

        // Rotation: a refresh token is single-use.
        self.repo.delete_refresh_token(&token_hash).await?;

        if record.expires_at < Utc::now() {
            return Err(AppError::Unauthorized);
        }

        let user = self.users.find_by_id(&record.user_id).await?
            .ok_or(AppError::Unauthorized)?;

        if user.status != UserStatus::Active {
            self.repo.delete_refresh_family(record.family_id).await?;
            return Err(AppError::Unauthorized);
        }

        self.issue_token_pair(&user, record.family_id, record.generation_id + 1).await
    }

    pub async fn logout(&self, raw_refresh_token: &str) -> Result<(), AppError> {
        let token_hash = self.hash_token(raw_refresh_token);
        match self.repo.find_refresh_token(&token_hash).await? {
            Some(record) => self.repo.delete_refresh_family(record.family_id).await,
            None => Ok(()),
        }
    }

    fn verify_access_token(&self, token: &str) -> Result<Identity, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[self.config.auth_issuer.as_str()]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?;

        Ok(Identity {
            user_id: token_data.claims.sub,
            role: token_data.claims.role,
        })
    }

    /// Verifies the access token and re-reads the account, so a ban or
    /// deactivation takes effect before the token expires.
    pub async fn authenticate(&self, token: &str) -> Result<Identity, AppError> {
        let identity = self.verify_access_token(token)?;
        let user = self.users.find_by_id(&identity.user_id).await?
            .ok_or(AppError::Unauthorized)?;
        ensure_can_sign_in(&user)?;
        Ok(Identity::from(&user))
    }

    async fn issue_token_pair(&self, user: &User, family_id: Uuid, generation_id: i32) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.config.access_token_ttl_minutes)).timestamp() as usize;

        let claims = Claims {
            iss: self.config.auth_issuer.clone(),
            sub: user.id.clone(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            role: user.role,
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        let refresh_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();

        let refresh_record = RefreshTokenRecord {
            token_hash: self.hash_token(&refresh_token),
            user_id: user.id.clone(),
            family_id,
            generation_id,
            expires_at: now + Duration::days(self.config.refresh_token_ttl_days),
            created_at: now,
        };

        self.repo.create_refresh_token(&refresh_record).await?;
        Ok(TokenPair { access_token, refresh_token })
    }

    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn ensure_can_sign_in(user: &User) -> Result<(), AppError> {
    match user.status {
        UserStatus::Active => Ok(()),
        UserStatus::Banned => Err(AppError::Forbidden("Account is banned".into())),
        UserStatus::Inactive => Err(AppError::Forbidden("Account is deactivated".into())),
    }
}
