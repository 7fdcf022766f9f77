/// Builder methods shared by every mode client wrapping a `GeminiHttpClient`.
macro_rules! impl_gemini_client_builders {
    ($client:ty) => {
        impl $client {
            pub fn with_base_url(mut self, base_url: String) -> Self {
                self.http = self.http.with_base_url(base_url);
                self
            }

            pub fn with_timeout(mut self, timeout: Option<std::time::Duration>) -> Self {
                self.http = self.http.with_timeout(timeout);
                self
            }

            pub fn model(&self) -> &str {
                self.http.model()
            }
        }
    };
}
pub(crate) use impl_gemini_client_builders;

pub mod audio;
pub mod client;
pub mod decode;
pub mod image;
pub mod text;
pub mod types;
pub mod vision;

#[cfg(test)]
pub(crate) mod test_support;

pub use audio::GeminiAudioClient;
pub use client::GeminiHttpClient;
pub use decode::ContentKind;
pub use image::GeminiImageClient;
pub use text::GeminiTextClient;
pub use vision::GeminiVisionClient;
