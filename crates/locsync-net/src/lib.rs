use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use locsync_core::Result;

/// Separator the service puts between change entries in an upload response.
const CHANGE_SEPARATOR: &str = "<br><br>";

/// Wrap encoded resource text in the upload body framing.
///
/// The exact three parts — literal prefix, standard base64 body, literal
/// suffix — are the wire contract the service expects; any change breaks
/// compatibility with its parser.
pub fn build_envelope(resource_text: &str) -> String {
    format!("file=BEGIN\n{}\nEND", STANDARD.encode(resource_text))
}

/// Split an upload response into human-readable change entries.
///
/// The first segment is a fixed preamble and is discarded. Best-effort
/// reporting only; nothing downstream branches on it.
pub fn parse_change_report(body: &str) -> Vec<String> {
    body.split(CHANGE_SEPARATOR)
        .skip(1)
        .map(|s| s.to_string())
        .collect()
}

/// Blocking client for the remote strings service.
pub struct StringsServer {
    client: reqwest::blocking::Client,
    base_url: String,
    pid: String,
    version: String,
    group: String,
}

impl StringsServer {
    /// `insecure` disables certificate verification; the service has
    /// historically run with a self-signed certificate.
    pub fn new(
        base_url: &str,
        pid: &str,
        version: &str,
        group: &str,
        insecure: bool,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("locsync/cli")
            .danger_accept_invalid_certs(insecure)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            pid: pid.to_string(),
            version: version.to_string(),
            group: group.to_string(),
        })
    }

    /// POST the enveloped resource text for the source language.
    /// Returns the raw response body for change reporting.
    pub fn upload_strings(&self, source_language: &str, resource_text: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/uploadStrings.php", self.base_url))
            // upload says `groupID`, download says `group`; both spellings
            // are fixed by the service
            .query(&[
                ("pid", self.pid.as_str()),
                ("version", self.version.as_str()),
                ("groupID", self.group.as_str()),
                ("language", source_language),
            ])
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(build_envelope(resource_text))
            .send()?
            .error_for_status()?;

        Ok(response.text()?)
    }

    /// GET the current resource text for one target language.
    pub fn fetch_strings(&self, language: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/getStrings.php", self.base_url))
            .query(&[
                ("pid", self.pid.as_str()),
                ("version", self.version.as_str()),
                ("group", self.group.as_str()),
                ("lang", language),
            ])
            .send()?
            .error_for_status()?;

        Ok(response.text()?)
    }
}
