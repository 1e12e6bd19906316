//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Registered accounts.
    ///
    /// `id` is a UUID v4 primary key. Credentials are stored as a per-account
    /// salt plus a hex SHA-256 digest.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        /// Per-account salt for the password digest.
        password_salt -> Varchar,
        /// Hex-encoded salted password digest.
        password_digest -> Varchar,
        /// Administrative override flag.
        is_admin -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// 1:1 profile rows, created in the registration transaction.
    user_profiles (user_id) {
        /// Primary key and foreign key to `users`.
        user_id -> Uuid,
        /// Contact phone number.
        phone -> Nullable<Varchar>,
        /// Emergency contact line.
        emergency_contact -> Nullable<Varchar>,
        /// Structured address: street line.
        street -> Nullable<Varchar>,
        /// Structured address: city.
        city -> Nullable<Varchar>,
        /// Structured address: state or region code.
        region -> Nullable<Varchar>,
        /// Structured address: country.
        country -> Nullable<Varchar>,
        /// Structured address: postal code.
        postal_code -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Insurance claims.
    ///
    /// `id` is a BigSerial; the identifier assigner derives the display
    /// identifiers from it after insert, so `claim_number` and
    /// `insurance_policy_number` are nullable until that second write lands.
    claims (id) {
        /// Primary key: store-assigned monotonic identity.
        id -> Int8,
        /// Owning principal, immutable after creation.
        user_id -> Uuid,
        /// Disaster taxonomy value.
        disaster_type -> Varchar,
        /// Property taxonomy value.
        property_type -> Varchar,
        /// Free-text loss description.
        description -> Text,
        /// Estimated loss in integer cents.
        estimated_loss_cents -> Int8,
        /// Lifecycle status.
        status -> Varchar,
        /// Predicted approval probability in hundredths, scorer-assigned.
        predicted_approval_hundredths -> Nullable<Int2>,
        /// Predicted coverage limit in integer cents, scorer-assigned.
        predicted_limit_cents -> Nullable<Int8>,
        /// Unique display claim number, assigned post-insert.
        claim_number -> Nullable<Varchar>,
        /// Unique display policy number, assigned post-insert.
        insurance_policy_number -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Claim attachments; rows cascade-delete with their claim.
    claim_documents (id) {
        /// Primary key.
        id -> Int8,
        /// Owning claim, immutable.
        claim_id -> Int8,
        /// Original upload filename.
        filename -> Varchar,
        /// Declared content type.
        content_type -> Varchar,
        /// Blob size in bytes.
        size_bytes -> Int8,
        /// Deterministic blob store reference.
        blob_ref -> Varchar,
        /// Upload timestamp.
        uploaded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Disaster declarations mirrored from the external feed.
    ///
    /// `(title, location)` carries a unique constraint; refreshes merge on it.
    disaster_updates (id) {
        /// Primary key.
        id -> Int8,
        /// Declaration title (natural key, first half).
        title -> Varchar,
        /// Designated area (natural key, second half).
        location -> Varchar,
        /// Internal disaster taxonomy value.
        disaster_type -> Varchar,
        /// Severity level (1=Low, 2=Medium, 3=High, 4=Unknown).
        severity -> Int2,
        /// Upstream declaration type code.
        declaration_type -> Varchar,
        /// Human-readable declaration label.
        declaration_display -> Varchar,
        /// Whether any assistance program is declared.
        assistance_available -> Bool,
        /// Attribution label for the upstream source.
        source -> Varchar,
        /// Canonical detail-page URL; empty when unknown.
        url -> Varchar,
        /// Upstream refresh timestamp (or processing time).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user notification ledger.
    notifications (id) {
        /// Primary key.
        id -> Int8,
        /// Owning principal.
        user_id -> Uuid,
        /// Short headline.
        title -> Varchar,
        /// Message body.
        message -> Text,
        /// Presentation category.
        kind -> Varchar,
        /// Read flag, false on creation.
        read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(user_profiles -> users (user_id));
diesel::joinable!(claims -> users (user_id));
diesel::joinable!(claim_documents -> claims (claim_id));
diesel::joinable!(notifications -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    user_profiles,
    claims,
    claim_documents,
    disaster_updates,
    notifications,
);
