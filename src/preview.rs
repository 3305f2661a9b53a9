use crate::invitation::Invitation;

pub const TITLE_PLACEHOLDER: &str = "__OG_TITLE__";
pub const DESCRIPTION_PLACEHOLDER: &str = "__OG_DESCRIPTION__";
pub const IMAGE_PLACEHOLDER: &str = "__OG_IMAGE__";
pub const URL_PLACEHOLDER: &str = "__OG_URL__";

// Values substituted into the share-preview template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewMeta {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub url: String,
}

impl PreviewMeta {
    // Landing-page defaults, served for unknown or absent ids.
    pub fn landing(base_url: &str) -> Self {
        Self {
            title: "셀프 모바일 청첩장 당일제작, 인스타 스토리 청첩장".to_string(),
            description: "인스타그램 스토리 형식의 감성적인 모바일 청첩장을 무료로 제작하세요. \
                          사진 업로드만으로 당일 제작 가능한 디지털 청첩장 서비스입니다."
                .to_string(),
            image_url: format!("{base_url}/mainPage0.png"),
            url: base_url.to_string(),
        }
    }

    pub fn for_invitation(id: &str, invitation: &Invitation, base_url: &str) -> Self {
        let mut description = invitation.wedding_date.clone();
        if !invitation.wedding_time.is_empty() {
            description.push_str(&format!(" {},", invitation.wedding_time));
        }
        description.push_str(&format!(" {}", invitation.wedding_location));
        if !invitation.wedding_hall.is_empty() {
            description.push_str(&format!(" {}", invitation.wedding_hall));
        }
        let image_url = invitation
            .image_paths
            .first()
            .map(|path| format!("{base_url}/{path}"))
            .unwrap_or_else(|| format!("{base_url}/mainPage0.png"));
        Self {
            title: invitation.couple_headline(),
            description,
            image_url,
            url: format!("{base_url}/invitation/{id}"),
        }
    }
}

pub fn render_preview(template: &str, meta: &PreviewMeta) -> String {
    template
        .replace(TITLE_PLACEHOLDER, &meta.title)
        .replace(DESCRIPTION_PLACEHOLDER, &meta.description)
        .replace(IMAGE_PLACEHOLDER, &meta.image_url)
        .replace(URL_PLACEHOLDER, &meta.url)
}
