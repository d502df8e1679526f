pub mod google_fit;
pub mod oauth;
pub mod traits;

pub use google_fit::GoogleFitClient;
pub use oauth::OAuthTokens;
pub use traits::CloudSync;
