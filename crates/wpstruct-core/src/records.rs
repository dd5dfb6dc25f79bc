// Blog API records. Field names are the protocol keys; `None` is "not sent".
use chrono::NaiveDateTime;

use crate::mapper::{PopulateContext, StructPatch, populate_field, serialize_field};
use crate::record;
use crate::registry::TypeRegistry;
use crate::value::Struct;

record! {
    pub struct Post {
        post_id: i32,
        post_title: String,
        post_date: NaiveDateTime,
        post_date_gmt: NaiveDateTime,
        post_modified: NaiveDateTime,
        post_modified_gmt: NaiveDateTime,
        post_status: String,
        post_type: String,
        post_format: String,
        post_name: String,
        post_author: i32,
        post_password: String,
        post_excerpt: String,
        post_content: String,
        post_parent: i32,
        post_mime_type: String,
        link: String,
        guid: String,
        menu_order: i32,
        comment_status: String,
        ping_status: String,
        sticky: bool,
        post_thumbnail: Vec<PostThumbnailImageMeta>,
        terms: Vec<Term>,
        custom_fields: Vec<CustomField>,
        enclosure: Enclosure,
    }
}

record! {
    pub struct Term {
        term_id: String,
        name: String,
        slug: String,
        term_group: String,
        term_taxonomy_id: String,
        taxonomy: String,
        description: String,
        parent: String,
        count: i32,
    }
}

record! {
    pub struct CustomField {
        id: String,
        key: String,
        value: String,
    }
}

record! {
    pub struct Enclosure {
        url: String,
        length: i32,
        r#type: String,
    }
}

record! {
    pub struct PostThumbnailImageMeta {
        attachment_id: i32,
        date_created_gmt: NaiveDateTime,
        parent: i32,
        link: String,
        title: String,
        caption: String,
        description: String,
        metadata: MediaItemMetadata,
        thumbnail: String,
    }
}

record! {
    pub struct User {
        user_id: i32,
        username: String,
        first_name: String,
        last_name: String,
        bio: String,
        email: String,
        nickname: String,
        nicename: String,
        url: String,
        display_name: String,
        registered: NaiveDateTime,
        roles: Vec<String>,
    }
}

record! {
    pub struct Comment {
        date_created_gmt: NaiveDateTime,
        user_id: i32,
        comment_id: i32,
        parent: i32,
        status: String,
        content: String,
        link: String,
        post_id: i32,
        post_title: String,
        author: String,
        author_url: String,
        author_email: String,
        author_ip: String,
    }
}

record! {
    pub struct PostType {
        name: String,
        label: String,
        hierarchical: bool,
        public: bool,
        show_ui: bool,
        has_archive: bool,
        menu_position: i32,
        menu_icon: String,
        supports: PostTypeSupport,
        labels: PostTypeLabels,
        cap: PostTypeCap,
        taxonomies: Vec<String>,
    }
}

record! {
    pub struct PostTypeSupport {
        title: bool,
        editor: bool,
        author: bool,
        thumbnail: bool,
        excerpt: bool,
        trackbacks: bool,
        custom_fields: bool,
        comments: bool,
        revisions: bool,
        page_attributes: bool,
        post_formats: bool,
    }
}

record! {
    pub struct PostTypeLabels {
        name: String,
        singular_name: String,
        add_new: String,
        add_new_item: String,
        edit_item: String,
        new_item: String,
        view_item: String,
        search_items: String,
        not_found: String,
        not_found_in_trash: String,
        parent_item_colon: String,
        all_items: String,
        menu_name: String,
        name_admin_bar: String,
    }
}

record! {
    pub struct PostTypeCap {
        edit_post: String,
        read_post: String,
        delete_post: String,
        edit_posts: String,
        edit_others_posts: String,
        publish_posts: String,
        read_private_posts: String,
        read: String,
        delete_posts: String,
        delete_private_posts: String,
        delete_published_posts: String,
        delete_others_posts: String,
        edit_private_posts: String,
        edit_published_posts: String,
    }
}

record! {
    pub struct MediaItem {
        attachment_id: i32,
        date_created_gmt: NaiveDateTime,
        parent: i32,
        link: String,
        title: String,
        caption: String,
        description: String,
        metadata: MediaItemMetadata,
        thumbnail: String,
    }
}

record! {
    pub struct MediaItemMetadata {
        width: i32,
        height: i32,
        file: String,
        sizes: MediaItemSizes,
    }
}

record! {
    pub struct MediaItemSizes {
        thumbnail: MediaItemSize,
        medium: MediaItemSize,
        large: MediaItemSize,
        post_thumbnail: MediaItemSize,
    }
}

record! {
    pub struct MediaItemSize {
        file: String,
        width: i32,
        height: i32,
    }
    patched {
        // sent as `mime-type`
        mime_type: String,
    }
}

const MIME_TYPE_KEY: &str = "mime-type";

impl StructPatch for MediaItemSize {
    fn patch_populate(&mut self, source: &Struct, ctx: &mut PopulateContext) {
        populate_field(&mut self.mime_type, MIME_TYPE_KEY, source, ctx);
    }

    fn patch_serialize(&self, out: &mut Struct) {
        serialize_field(&self.mime_type, MIME_TYPE_KEY, out);
    }
}

record! {
    pub struct MediaItemUploadResult {
        id: i32,
        file: String,
        url: String,
        r#type: String,
    }
}

pub(crate) fn register_all(reg: &mut TypeRegistry) {
    reg.register::<Post>()
        .register::<Term>()
        .register::<CustomField>()
        .register::<Enclosure>()
        .register::<PostThumbnailImageMeta>()
        .register::<User>()
        .register::<Comment>()
        .register::<PostType>()
        .register::<PostTypeSupport>()
        .register::<PostTypeLabels>()
        .register::<PostTypeCap>()
        .register::<MediaItem>()
        .register::<MediaItemMetadata>()
        .register::<MediaItemSizes>()
        .register::<MediaItemSize>()
        .register::<MediaItemUploadResult>();
}
