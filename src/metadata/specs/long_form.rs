// iTunes long-form ("----") keys, stored already normalized (lowercase, no namespace)

pub(super) const NAMESPACE: &str = "com.apple.itunes";

pub(super) const KEYS: &[(&str, &str)] = &[
    ("itunsmpb", "Gapless Playback"),
    ("itunnorm", "Sound Check"),
    ("itunpgap", "Playlist Delay"),
    ("itunextc", "Classification"),
    ("itunes pid", "iTunes PID"),
    ("itunes_cddb_ids", "CDDB IDs"),
    ("itunes_cddb_1", "CDDB 1"),
    ("itunes_cddb_tracknumber", "CDDB Track Number"),
    ("itunes_start_time", "Start Time"),
    ("itunes_stop_time", "Stop Time"),
    ("itunes_volume_adjustment", "Volume Adjustment"),
    ("encodingparams", "Encoding Parameters"),
    ("encoding", "Encoder Settings"),
    ("encodingtime", "Encoding Time"),
    ("accurateripdiscid", "AccurateRip Disc ID"),
    ("accurateripresult", "AccurateRip Result"),
    ("acoustid fingerprint", "Acoustid Fingerprint"),
    ("acoustid id", "Acoustid Id"),
    ("musicippuid", "MusicIP PUID"),
    ("musicbrainzartistid", "MusicBrainz Artist ID"),
    ("musicbrainzalbumartistid", "MusicBrainz Album Artist ID"),
    ("musicbrainzalbumid", "MusicBrainz Album ID"),
    ("musicbrainztrackid", "MusicBrainz Track ID"),
    ("musicbrainz album artist id", "MusicBrainz Album Artist Id"),
    ("musicbrainz artist id", "MusicBrainz Artist Id"),
    ("musicbrainz album id", "MusicBrainz Release Id"),
    ("musicbrainz album status", "MusicBrainz Release Status"),
    ("musicbrainz album type", "MusicBrainz Release Type"),
    ("musicbrainz album release country", "MusicBrainz Release Country"),
    ("musicbrainz release group id", "MusicBrainz Release Group Id"),
    ("musicbrainz release track id", "MusicBrainz Release Track Id"),
    ("musicbrainz track id", "MusicBrainz Recording Id"),
    ("musicbrainz disc id", "MusicBrainz Disc Id"),
    ("musicbrainz work id", "MusicBrainz Work Id"),
    ("musiciancredits", "Musician Credits"),
    ("asin", "ASIN"),
    ("barcode", "Barcode"),
    ("upc", "UPC"),
    ("isrc", "ISRC"),
    ("catalognumber", "Catalog Number"),
    ("category", "Category"),
    ("conductor", "Conductor"),
    ("country", "Country"),
    ("cuesheet", "CUESHEET"),
    ("djmixer", "DJ Mixer"),
    ("engineer", "Engineer"),
    ("filetype", "File Type"),
    ("instrumental", "Instrumental"),
    ("involvedpeople", "Involved People"),
    ("key", "Initial Key"),
    ("label", "Label"),
    ("language", "Language"),
    ("length", "Length (ms)"),
    ("lyricist", "Lyricist"),
    ("media", "Media Type"),
    ("mixer", "Mixer"),
    ("mood", "Mood"),
    ("original album", "Original Album"),
    ("original artist", "Original Artist"),
    ("original filename", "Original Filename"),
    ("original lyricist", "Original Lyricist"),
    ("original year", "Original Release Time"),
    ("playcount", "Play Count"),
    ("producer", "Producer"),
    ("publisher", "Publisher"),
    ("rating", "Rating"),
    ("releasetime", "Release Time"),
    ("remixer", "Remixer"),
    ("replaygain_album_gain", "ReplayGain Album Gain"),
    ("replaygain_album_peak", "ReplayGain Album Peak"),
    ("replaygain_track_gain", "ReplayGain Track Gain"),
    ("replaygain_track_peak", "ReplayGain Track Peak"),
    ("script", "MusicBrainz Script"),
    ("set subtitle", "Set Subtitle"),
    ("source", "Source"),
    ("taggingtime", "Tagging Time"),
    ("termsofuse", "Terms of Use"),
    ("tool", "Tool"),
    ("track number text", "Track Position"),
    ("ufid", "Unique File Identifier"),
];
